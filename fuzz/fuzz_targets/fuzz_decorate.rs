#![no_main]

use libfuzzer_sys::fuzz_target;
use querylens::decorate::decorate;
use querylens::highlight::{hover_at, project};
use querylens::query::{PatternKind, ScanOptions, scan};

fuzz_target!(|data: &str| {
    for pattern_kind in [PatternKind::Regexp, PatternKind::Structural] {
        let options = ScanOptions {
            pattern_kind,
            ..ScanOptions::default()
        };
        let Ok(sequence) = scan(data, &options) else {
            return;
        };

        // Decoration keeps the sequence gap-free
        let decorated = decorate(&sequence);
        let mut end = 0;
        for token in &decorated.members {
            assert_eq!(token.range().start, end);
            end = token.range().end;
        }
        assert_eq!(end, data.len());

        let scoped = project(&decorated);
        assert!(scoped.windows(2).all(|pair| pair[0].start < pair[1].start));

        for column in 0..=data.len() + 1 {
            let _ = hover_at(&decorated, column);
        }
    }
});
