use crate::highlight::scoped_spans;
use crate::tui::app::{App, Outcome};
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, List, ListItem, Paragraph, Wrap},
};

pub fn draw(f: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Query input
            Constraint::Min(8),    // Tree / tokens
            Constraint::Length(4), // Hover
            Constraint::Length(1), // Status bar
        ])
        .split(f.area());

    draw_query_input(f, app, chunks[0]);
    draw_main_area(f, app, chunks[1]);
    draw_hover(f, app, chunks[2]);
    draw_status_bar(f, app, chunks[3]);
}

fn scope_style(scope: &str) -> Style {
    let style = Style::default();
    match scope {
        "keyword" => style.fg(Color::Blue).add_modifier(Modifier::BOLD),
        "operator" => style.fg(Color::Magenta).add_modifier(Modifier::BOLD),
        "identifier" => style.fg(Color::Green),
        "paren" => style.fg(Color::Yellow),
        "comment" => style.fg(Color::DarkGray).add_modifier(Modifier::ITALIC),
        scope if scope.starts_with("metaRegexp") => style.fg(Color::Cyan),
        scope if scope.starts_with("metaStructural") => {
            style.fg(Color::Red).add_modifier(Modifier::BOLD)
        }
        scope if scope.starts_with("metaPath") => {
            style.fg(Color::Yellow).add_modifier(Modifier::BOLD)
        }
        _ => style,
    }
}

fn draw_query_input(f: &mut Frame, app: &App, area: Rect) {
    let line = if app.analysis.scoped.is_empty() {
        Line::from(app.query.as_str())
    } else {
        let spans: Vec<Span> = scoped_spans(&app.analysis.scoped, app.query.len())
            .into_iter()
            .map(|(range, scope)| Span::styled(range.slice(&app.query), scope_style(scope)))
            .collect();
        Line::from(spans)
    };

    let input = Paragraph::new(line).block(
        Block::default()
            .borders(Borders::ALL)
            .title(" Query "),
    );
    f.render_widget(input, area);

    f.set_cursor_position((area.x + app.cursor_column() as u16 + 1, area.y + 1));
}

fn draw_main_area(f: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(area);

    draw_tree(f, app, chunks[0]);
    draw_tokens(f, app, chunks[1]);
}

fn draw_tree(f: &mut Frame, app: &App, area: Rect) {
    let error_style = Style::default().fg(Color::Red);
    let content = match &app.analysis.outcome {
        Outcome::Parsed(nodes) if nodes.is_empty() => Text::styled(
            "empty query",
            Style::default().fg(Color::DarkGray),
        ),
        Outcome::Parsed(nodes) => Text::from(
            nodes
                .iter()
                .map(|node| Line::from(node.to_string()))
                .collect::<Vec<_>>(),
        ),
        Outcome::ParseFailed(err) => Text::styled(format!("parse error: {}", err), error_style),
        Outcome::ScanFailed(err) => Text::styled(format!("scan error: {}", err), error_style),
    };

    let tree = Paragraph::new(content)
        .block(Block::default().borders(Borders::ALL).title(" Parse tree "))
        .wrap(Wrap { trim: false });
    f.render_widget(tree, area);
}

fn draw_tokens(f: &mut Frame, app: &App, area: Rect) {
    let items: Vec<ListItem> = app
        .analysis
        .sequence
        .members
        .iter()
        .map(|token| {
            let range = token.range();
            let selected = range.start <= app.cursor && app.cursor < range.end;
            let style = if selected {
                Style::default()
                    .bg(Color::DarkGray)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default()
            };

            let line = Line::from(vec![
                Span::styled(
                    format!("{:>3}..{:<3} ", range.start, range.end),
                    Style::default().fg(Color::DarkGray),
                ),
                Span::styled(
                    format!("{:<15}", token.type_name()),
                    Style::default().fg(Color::Magenta),
                ),
                Span::raw(format!("{:?}", range.slice(&app.query))),
            ]);
            ListItem::new(line).style(style)
        })
        .collect();

    let list = List::new(items).block(
        Block::default()
            .borders(Borders::ALL)
            .title(format!(" Tokens ({}) ", app.analysis.sequence.members.len())),
    );
    f.render_widget(list, area);
}

fn draw_hover(f: &mut Frame, app: &App, area: Rect) {
    let content = match app.hover() {
        Some(hover) => hover.contents,
        None => String::new(),
    };

    let hover = Paragraph::new(content)
        .block(Block::default().borders(Borders::ALL).title(" Hover "))
        .wrap(Wrap { trim: true });
    f.render_widget(hover, area);
}

fn draw_status_bar(f: &mut Frame, app: &App, area: Rect) {
    let status = Paragraph::new(app.status_line()).style(Style::default().fg(Color::Cyan));
    f.render_widget(status, area);
}
