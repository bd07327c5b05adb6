#![no_main]

use libfuzzer_sys::fuzz_target;
use querylens::query::{ScanOptions, parse, scan};

fuzz_target!(|data: &str| {
    let options = ScanOptions {
        interpret_comments: data.len() % 2 == 0,
        ..ScanOptions::default()
    };

    // A successful scan covers every byte, in order
    if let Ok(sequence) = scan(data, &options) {
        let mut end = 0;
        for token in &sequence.members {
            let range = token.range();
            assert_eq!(range.start, end);
            assert!(range.end > range.start);
            end = range.end;
        }
        assert_eq!(end, data.len());

        let _ = parse(&sequence);
    }
});
