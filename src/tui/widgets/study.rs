use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, Paragraph, Wrap},
    Frame,
};

use crate::models::{Grade, PronunciationFeedback, Record};
use crate::session::{Phase, StudyMode, StudySession};
use crate::tui::App;

pub fn draw(f: &mut Frame, app: &App, area: Rect) {
    let Some(session) = &app.session else {
        let block = Block::default().borders(Borders::ALL).title(" Study ");
        f.render_widget(Paragraph::new("No session").block(block), area);
        return;
    };

    let title = format!(" Study {} ", app.study_kind.label());
    match session.phase() {
        Phase::ModeSelect => draw_mode_select(f, session, &title, area),
        Phase::Active(mode) => draw_active(f, app, session, mode, &title, area),
        Phase::Complete | Phase::Exited => draw_summary(f, session, &title, area),
    }
}

fn draw_mode_select(f: &mut Frame, session: &StudySession, title: &str, area: Rect) {
    let mut text = vec![
        Line::from(format!("{} items due. Choose how to review them:", session.len())),
        Line::from(""),
    ];
    for (i, mode) in StudyMode::ALL.iter().enumerate() {
        text.push(Line::from(vec![
            Span::styled(
                format!("  {}  {:<10}", i + 1, mode.as_str()),
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(mode.description(), Style::default().fg(Color::Gray)),
        ]));
    }

    let block = Block::default()
        .borders(Borders::ALL)
        .title(title.to_string())
        .title_style(Style::default().fg(Color::Cyan));
    f.render_widget(Paragraph::new(text).block(block), area);
}

fn draw_active(
    f: &mut Frame,
    app: &App,
    session: &StudySession,
    mode: StudyMode,
    title: &str,
    area: Rect,
) {
    let Some(item) = session.current_item() else {
        return;
    };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Progress
            Constraint::Min(0),    // Card
            Constraint::Length(3), // Grades
        ])
        .split(area);

    let ratio = (session.position() - 1) as f64 / session.len().max(1) as f64;
    let gauge = Gauge::default()
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(title.to_string())
                .title_style(Style::default().fg(Color::Cyan)),
        )
        .gauge_style(Style::default().fg(Color::Green))
        .ratio(ratio.clamp(0.0, 1.0))
        .label(format!(
            "{}/{}  {}",
            session.position(),
            session.len(),
            mode.as_str()
        ));
    f.render_widget(gauge, chunks[0]);

    let card = match mode {
        StudyMode::Flashcard => flashcard_lines(session, item, app.feedback.as_ref()),
        StudyMode::Typing => typing_lines(session, item),
        StudyMode::Quiz => quiz_lines(session, item),
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .title(format!(" {} ", item.srs().mastery_label()));
    f.render_widget(
        Paragraph::new(card)
            .block(block)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true }),
        chunks[1],
    );

    draw_grades(f, session.is_revealed(), chunks[2]);
}

fn front(text: &str) -> Line<'static> {
    Line::from(Span::styled(
        text.to_string(),
        Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD),
    ))
}

fn flashcard_lines(
    session: &StudySession,
    item: &Record,
    feedback: Option<&PronunciationFeedback>,
) -> Vec<Line<'static>> {
    let mut lines = vec![Line::from(""), front(item.text()), Line::from("")];
    if session.card().flipped {
        lines.extend(item.back_lines().into_iter().map(Line::from));
    } else if session.is_audio_check_running() {
        lines.push(Line::from("Checking pronunciation..."));
    } else {
        lines.push(Line::from(Span::styled(
            "<Space> to flip",
            Style::default().fg(Color::DarkGray),
        )));
    }

    if let Some(feedback) = feedback {
        let color = if feedback.score >= 80 {
            Color::Green
        } else {
            Color::Yellow
        };
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            format!("Pronunciation {}/100", feedback.score),
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        )));
        lines.push(Line::from(feedback.feedback_english.clone()));
        if !feedback.feedback_native.is_empty() {
            lines.push(Line::from(feedback.feedback_native.clone()));
        }
        for tip in &feedback.tips {
            lines.push(Line::from(format!("- {}", tip)));
        }
    }
    lines
}

fn typing_lines(session: &StudySession, item: &Record) -> Vec<Line<'static>> {
    let card = session.card();
    let mut lines = vec![
        Line::from(""),
        front(item.summary()),
        Line::from(""),
        Line::from(vec![
            Span::raw("> "),
            Span::styled(card.input.clone(), Style::default().fg(Color::White)),
            Span::styled(
                if card.correct.is_none() { "█" } else { "" },
                Style::default().fg(Color::Yellow),
            ),
        ]),
    ];

    match card.correct {
        Some(true) => {
            lines.push(Line::from(""));
            lines.push(Line::from(Span::styled(
                "Correct!",
                Style::default().fg(Color::Green),
            )));
        }
        Some(false) => {
            lines.push(Line::from(""));
            lines.push(Line::from(vec![
                Span::styled("Answer: ", Style::default().fg(Color::Red)),
                Span::styled(
                    item.text().to_string(),
                    Style::default().add_modifier(Modifier::BOLD),
                ),
            ]));
        }
        None => {}
    }
    lines
}

fn quiz_lines(session: &StudySession, item: &Record) -> Vec<Line<'static>> {
    let card = session.card();
    let correct = session.correct_option();
    let mut lines = vec![Line::from(""), front(item.summary()), Line::from("")];

    for (i, option) in card.options.iter().enumerate() {
        let letter = (b'a' + i as u8) as char;
        let style = match card.selected {
            Some(_) if Some(i) == correct => Style::default().fg(Color::Green),
            Some(sel) if sel == i => Style::default().fg(Color::Red),
            _ => Style::default().fg(Color::White),
        };
        lines.push(Line::from(Span::styled(format!("{})  {}", letter, option), style)));
    }
    lines
}

fn draw_grades(f: &mut Frame, revealed: bool, area: Rect) {
    let color = if revealed { Color::Cyan } else { Color::DarkGray };
    let mut spans = Vec::new();
    for (i, grade) in Grade::ALL.iter().enumerate() {
        spans.push(Span::styled(format!("{} ", i + 1), Style::default().fg(color)));
        spans.push(Span::raw(format!("{}   ", grade.label())));
    }

    let paragraph = Paragraph::new(Line::from(spans))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL).title(" Grade "));
    f.render_widget(paragraph, area);
}

fn draw_summary(f: &mut Frame, session: &StudySession, title: &str, area: Rect) {
    let stats = session.stats();
    let text = if stats.reviewed == 0 && session.is_empty() {
        vec![
            Line::from(""),
            Line::from("Nothing is due right now."),
        ]
    } else {
        vec![
            Line::from(""),
            Line::from(Span::styled(
                "Session complete",
                Style::default()
                    .fg(Color::Green)
                    .add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
            Line::from(format!("Reviewed: {}", stats.reviewed)),
            Line::from(format!("Forgotten: {}", stats.forgotten)),
        ]
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .title(title.to_string())
        .title_style(Style::default().fg(Color::Cyan));
    f.render_widget(
        Paragraph::new(text).block(block).alignment(Alignment::Center),
        area,
    );
}
