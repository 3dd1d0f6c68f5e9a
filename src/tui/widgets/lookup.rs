use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use crate::models::{Example, Record, SentenceRecord, WordRecord};
use crate::tui::App;

pub fn draw(f: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Query input
            Constraint::Min(0),    // Result
        ])
        .split(area);

    draw_input(f, app, chunks[0]);
    draw_result(f, app, chunks[1]);
}

fn draw_input(f: &mut Frame, app: &App, area: Rect) {
    let pane = &app.lookup;

    let mut spans = vec![Span::styled(
        pane.input.clone(),
        Style::default().fg(Color::White),
    )];
    if pane.editing {
        spans.push(Span::styled("█", Style::default().fg(Color::Yellow)));
    }
    if pane.loading {
        spans.push(Span::styled(
            "  looking up...",
            Style::default().fg(Color::DarkGray),
        ));
    }

    let border = if pane.editing {
        Color::Yellow
    } else {
        Color::Gray
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border))
        .title(format!(" Look up {} ", pane.kind.as_str()))
        .title_style(Style::default().fg(Color::Cyan));

    f.render_widget(Paragraph::new(Line::from(spans)).block(block), area);
}

fn draw_result(f: &mut Frame, app: &App, area: Rect) {
    let pane = &app.lookup;
    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Result ")
        .title_style(Style::default().fg(Color::Yellow));

    let mut text = Vec::new();
    if let Some(error) = &pane.error {
        text.push(Line::from(Span::styled(
            error.clone(),
            Style::default().fg(Color::Red),
        )));
        text.push(Line::from(""));
    }

    match &pane.result {
        Some(Record::Word(w)) => text.extend(word_lines(w)),
        Some(Record::Sentence(s)) => text.extend(sentence_lines(s)),
        None if pane.error.is_none() => text.push(Line::from(Span::styled(
            "Press 'i' and start typing.",
            Style::default().fg(Color::DarkGray),
        ))),
        None => {}
    }

    let paragraph = Paragraph::new(text).block(block).wrap(Wrap { trim: false });
    f.render_widget(paragraph, area);
}

fn heading(label: &str) -> Line<'static> {
    Line::from(Span::styled(
        label.to_string(),
        Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD),
    ))
}

fn example_lines(examples: &[Example]) -> Vec<Line<'static>> {
    let mut lines = Vec::new();
    for ex in examples {
        lines.push(Line::from(format!("  - {}", ex.english)));
        if !ex.translation.is_empty() {
            lines.push(Line::from(Span::styled(
                format!("    {}", ex.translation),
                Style::default().fg(Color::Gray),
            )));
        }
    }
    lines
}

fn word_lines(w: &WordRecord) -> Vec<Line<'static>> {
    let mut lines = vec![
        Line::from(vec![
            Span::styled(
                w.word.clone(),
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw("  "),
            Span::styled(format!("/{}/", w.ipa.trim_matches('/')), Style::default().fg(Color::Gray)),
            Span::raw("  "),
            Span::styled(w.part_of_speech.clone(), Style::default().fg(Color::Magenta)),
        ]),
        Line::from(""),
        Line::from(Span::styled(
            w.meaning.clone(),
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(w.definition.clone()),
    ];

    if !w.examples.is_empty() {
        lines.push(Line::from(""));
        lines.push(heading("Examples"));
        lines.extend(example_lines(&w.examples));
    }
    if !w.synonyms.is_empty() {
        lines.push(Line::from(""));
        lines.push(Line::from(vec![
            Span::styled("Synonyms: ", Style::default().fg(Color::Gray)),
            Span::raw(w.synonyms.join(", ")),
        ]));
    }
    if !w.antonyms.is_empty() {
        lines.push(Line::from(vec![
            Span::styled("Antonyms: ", Style::default().fg(Color::Gray)),
            Span::raw(w.antonyms.join(", ")),
        ]));
    }
    if let Some(mnemonic) = &w.mnemonic {
        lines.push(Line::from(""));
        lines.push(Line::from(vec![
            Span::styled("Mnemonic: ", Style::default().fg(Color::Gray)),
            Span::raw(mnemonic.clone()),
        ]));
    }
    lines
}

fn sentence_lines(s: &SentenceRecord) -> Vec<Line<'static>> {
    let naturalness_color = match s.naturalness {
        80..=100 => Color::Green,
        50..=79 => Color::Yellow,
        _ => Color::Red,
    };

    let mut lines = vec![
        Line::from(Span::styled(
            s.sentence.clone(),
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(Span::styled(
            s.translation.clone(),
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(vec![
            Span::styled("Naturalness: ", Style::default().fg(Color::Gray)),
            Span::styled(format!("{}/100", s.naturalness), Style::default().fg(naturalness_color)),
        ]),
    ];

    if !s.grammar.is_empty() {
        lines.push(Line::from(""));
        lines.push(heading("Grammar"));
        for point in &s.grammar {
            lines.push(Line::from(vec![
                Span::styled(format!("  {}: ", point.segment), Style::default().fg(Color::Yellow)),
                Span::raw(point.explanation.clone()),
            ]));
        }
    }
    if !s.usage.is_empty() {
        lines.push(Line::from(""));
        lines.push(heading("Usage"));
        lines.push(Line::from(format!("  {}", s.usage)));
    }
    if !s.similar.is_empty() {
        lines.push(Line::from(""));
        lines.push(heading("Similar"));
        lines.extend(example_lines(&s.similar));
    }
    lines
}
