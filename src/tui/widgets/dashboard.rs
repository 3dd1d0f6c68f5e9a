use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph},
    Frame,
};

use super::{mastery_bar, truncate};
use crate::app::DeckStats;
use crate::models::RecordKind;
use crate::tui::App;

pub fn draw(f: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(7), // Deck stats row
            Constraint::Min(0),    // Due items
        ])
        .split(area);

    let top_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(chunks[0]);

    draw_stats(f, RecordKind::Word, &app.word_stats, top_chunks[0]);
    draw_stats(f, RecordKind::Sentence, &app.sentence_stats, top_chunks[1]);
    draw_due_items(f, app, chunks[1]);
}

fn draw_stats(f: &mut Frame, kind: RecordKind, stats: &DeckStats, area: Rect) {
    let text = vec![
        Line::from(vec![
            Span::styled("Saved: ", Style::default().fg(Color::Gray)),
            Span::styled(
                format!("{}", stats.total),
                Style::default()
                    .fg(Color::White)
                    .add_modifier(Modifier::BOLD),
            ),
        ]),
        Line::from(vec![
            Span::styled("Due: ", Style::default().fg(Color::Gray)),
            Span::styled(
                format!("{}", stats.due_now),
                Style::default().fg(if stats.due_now > 0 {
                    Color::Yellow
                } else {
                    Color::White
                }),
            ),
        ]),
        Line::from(vec![
            Span::styled("Mastered: ", Style::default().fg(Color::Gray)),
            Span::styled(
                format!("{}", stats.mastered),
                Style::default().fg(Color::Green),
            ),
        ]),
        Line::from(vec![
            Span::styled("Avg Level: ", Style::default().fg(Color::Gray)),
            Span::styled(
                format!("{:.1}", stats.avg_level),
                Style::default().fg(Color::Cyan),
            ),
        ]),
    ];

    let block = Block::default()
        .borders(Borders::ALL)
        .title(format!(" {} ", kind.label()))
        .title_style(Style::default().fg(Color::Cyan));

    let paragraph = Paragraph::new(text).block(block);
    f.render_widget(paragraph, area);
}

fn draw_due_items(f: &mut Frame, app: &App, area: Rect) {
    let items: Vec<ListItem> = app
        .due_items
        .iter()
        .enumerate()
        .map(|(i, record)| {
            let level = record.srs().level();
            let style = if level == 0 {
                Style::default().fg(Color::Red)
            } else {
                Style::default().fg(Color::Yellow)
            };

            ListItem::new(Line::from(vec![
                Span::styled(format!("{:>3}. ", i + 1), Style::default().fg(Color::DarkGray)),
                Span::styled(
                    format!("{:<10}", record.kind().as_str()),
                    Style::default().fg(Color::DarkGray),
                ),
                Span::styled(format!("{:<32}", truncate(record.text(), 30)), style),
                Span::styled(mastery_bar(level), Style::default().fg(Color::Green)),
            ]))
        })
        .collect();

    let block = Block::default()
        .borders(Borders::ALL)
        .title(format!(" Due for Review ({}) ", app.due_items.len()))
        .title_style(Style::default().fg(Color::Yellow));

    let list = List::new(items).block(block);
    f.render_widget(list, area);
}
