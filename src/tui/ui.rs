use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Tabs},
    Frame,
};

use super::widgets::{dashboard, deck, lookup, study};
use super::{App, View};
use crate::models::RecordKind;
use crate::session::{Phase, StudyMode};

pub fn draw(f: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Tab bar
            Constraint::Min(0),    // Content
            Constraint::Length(1), // Help bar
        ])
        .split(f.area());

    draw_tabs(f, app, chunks[0]);
    draw_content(f, app, chunks[1]);
    draw_help_bar(f, app, chunks[2]);
}

fn draw_tabs(f: &mut Frame, app: &App, area: Rect) {
    let tab_titles = vec!["Dashboard", "Lookup", "Words", "Sentences", "Study"];
    let selected = match app.view {
        View::Dashboard => 0,
        View::Lookup => 1,
        View::Words => 2,
        View::Sentences => 3,
        View::Study => 4,
    };

    let title = if app.auto_pronounce {
        " Lexicard (auto-pronounce) "
    } else {
        " Lexicard "
    };

    let tabs = Tabs::new(tab_titles)
        .block(Block::default().borders(Borders::ALL).title(title))
        .select(selected)
        .style(Style::default().fg(Color::White))
        .highlight_style(
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        );

    f.render_widget(tabs, area);
}

fn draw_content(f: &mut Frame, app: &App, area: Rect) {
    match app.view {
        View::Dashboard => dashboard::draw(f, app, area),
        View::Lookup => lookup::draw(f, app, area),
        View::Words => deck::draw(f, app, RecordKind::Word, area),
        View::Sentences => deck::draw(f, app, RecordKind::Sentence, area),
        View::Study => study::draw(f, app, area),
    }
}

fn key(k: &'static str) -> Span<'static> {
    Span::styled(k, Style::default().fg(Color::Cyan))
}

fn draw_help_bar(f: &mut Frame, app: &App, area: Rect) {
    let mut spans = Vec::new();

    if let Some(status) = &app.status {
        spans.push(Span::styled(
            format!("{} | ", status),
            Style::default().fg(Color::Yellow),
        ));
    }

    if app.lookup.editing {
        spans.extend(vec![
            key("<CR>"),
            Span::raw(" Look up now  "),
            key("^u"),
            Span::raw(" Clear  "),
            key("<Esc>"),
            Span::raw(" Done"),
        ]);
    } else if app.view == View::Study {
        let phase = app.session.as_ref().map(|s| s.phase());
        match phase {
            Some(Phase::ModeSelect) => spans.extend(vec![
                key("1/f"),
                Span::raw(" Flashcard  "),
                key("2/t"),
                Span::raw(" Typing  "),
                key("3/q"),
                Span::raw(" Quiz  "),
            ]),
            Some(Phase::Active(mode)) => {
                match mode {
                    StudyMode::Flashcard => spans.extend(vec![
                        key("<Space>"),
                        Span::raw(" Flip  "),
                        key("p"),
                        Span::raw(" Speak  "),
                        key("r"),
                        Span::raw(" Check recording  "),
                    ]),
                    StudyMode::Typing => spans.extend(vec![key("<CR>"), Span::raw(" Check  ")]),
                    StudyMode::Quiz => spans.extend(vec![key("a-d"), Span::raw(" Pick  ")]),
                }
                spans.extend(vec![key("1-4"), Span::raw(" Grade  ")]);
            }
            Some(Phase::Complete) => spans.extend(vec![key("<CR>"), Span::raw(" Done  ")]),
            _ => {}
        }
        spans.extend(vec![key("<Esc>"), Span::raw(" Leave")]);
    } else {
        spans.extend(vec![key("h/l"), Span::raw(" Views  ")]);

        match app.view {
            View::Dashboard => spans.extend(vec![
                key("s/S"),
                Span::raw(" Study words/sentences  "),
                key("A"),
                Span::raw(" Auto-pronounce  "),
                key("^r"),
                Span::raw(" Refresh  "),
            ]),
            View::Lookup => spans.extend(vec![
                key("i"),
                Span::raw(" Type  "),
                key("t"),
                Span::raw(" Word/Sentence  "),
                key("a"),
                Span::raw(" Save  "),
                key("p"),
                Span::raw(" Speak  "),
            ]),
            View::Words | View::Sentences => spans.extend(vec![
                key("j/k"),
                Span::raw(" Nav  "),
                key("g/G"),
                Span::raw(" Top/Bot  "),
                key("p"),
                Span::raw(" Speak  "),
                key("d"),
                Span::raw(" Delete  "),
                key("s"),
                Span::raw(" Study  "),
            ]),
            View::Study => {}
        }

        spans.extend(vec![key("q"), Span::raw(" Quit")]);
    }

    let help = Paragraph::new(Line::from(spans)).style(Style::default().bg(Color::DarkGray));

    f.render_widget(help, area);
}
