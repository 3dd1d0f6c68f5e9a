use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap},
    Frame,
};

use super::{mastery_bar, truncate};
use crate::models::{Record, RecordKind};
use crate::srs;
use crate::tui::App;

pub fn draw(f: &mut Frame, app: &App, kind: RecordKind, area: Rect) {
    let list = match kind {
        RecordKind::Word => &app.words,
        RecordKind::Sentence => &app.sentences,
    };

    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
        .split(area);

    let now = srs::now_ms();
    let items: Vec<ListItem> = list
        .items
        .iter()
        .map(|record| {
            let srs = record.srs();
            let (next_color, next_text) = if srs.is_due(now) {
                (Color::Red, format!("{} !", srs.next_review_label()))
            } else {
                (Color::White, srs.next_review_label())
            };

            ListItem::new(Line::from(vec![
                Span::styled(
                    format!("{:<28}", truncate(record.text(), 26)),
                    Style::default().fg(Color::White),
                ),
                Span::styled(mastery_bar(srs.level()), Style::default().fg(Color::Green)),
                Span::styled(
                    format!(" {:<12}", srs.mastery_label()),
                    Style::default().fg(Color::Cyan),
                ),
                Span::styled(next_text, Style::default().fg(next_color)),
            ]))
        })
        .collect();

    let block = Block::default()
        .borders(Borders::ALL)
        .title(format!(" {} ({}) ", kind.label(), list.items.len()))
        .title_style(Style::default().fg(Color::Cyan));

    let widget = List::new(items)
        .block(block)
        .highlight_style(
            Style::default()
                .bg(Color::DarkGray)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("> ");

    let mut state = ListState::default();
    state.select(list.selected);
    f.render_stateful_widget(widget, chunks[0], &mut state);

    draw_detail(f, list.selected_item(), chunks[1]);
}

fn draw_detail(f: &mut Frame, record: Option<&Record>, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Detail ")
        .title_style(Style::default().fg(Color::Yellow));

    let Some(record) = record else {
        let paragraph = Paragraph::new("Nothing saved yet. Look something up and press 'a'.")
            .block(block)
            .wrap(Wrap { trim: true });
        f.render_widget(paragraph, area);
        return;
    };

    let mut text = vec![
        Line::from(Span::styled(
            record.text().to_string(),
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
    ];
    text.extend(record.back_lines().into_iter().map(Line::from));

    let paragraph = Paragraph::new(text).block(block).wrap(Wrap { trim: true });
    f.render_widget(paragraph, area);
}
