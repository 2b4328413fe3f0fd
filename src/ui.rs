use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Gauge, Paragraph, Widget, Wrap},
};
use std::time::Instant;
use unicode_width::UnicodeWidthStr;

use crate::app::{App, AppState, SessionOutcome};
use crate::evaluator::PositionState;
use crate::levels::{Shortfall, Verdict};
use crate::metrics::Metrics;
use crate::session::Mode;

const HORIZONTAL_MARGIN: u16 = 5;
const VERTICAL_MARGIN: u16 = 2;

/// The app as seen at one instant on the caller's clock.
pub struct View<'a> {
    app: &'a App,
    now: Instant,
}

impl<'a> View<'a> {
    pub fn new(app: &'a App, now: Instant) -> Self {
        Self { app, now }
    }
}

impl Widget for View<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let area = constrain_width(area, self.app.config.display.max_width);
        match self.app.state {
            AppState::Typing => render_typing(self.app, self.now, area, buf),
            AppState::Results => render_results(self.app, area, buf),
        }
    }
}

fn constrain_width(area: Rect, max_width: u16) -> Rect {
    let width = area.width.min(max_width.max(HORIZONTAL_MARGIN * 2 + 1));
    Rect {
        x: area.x + (area.width - width) / 2,
        width,
        ..area
    }
}

fn bold() -> Style {
    Style::default().add_modifier(Modifier::BOLD)
}

fn header(app: &App) -> String {
    match (app.session.mode, app.level) {
        (Mode::Challenge, Some(level)) => format!(
            "level {} · {}{}",
            level.number,
            level.tier(),
            if level.boss { " · boss round" } else { "" }
        ),
        (mode, _) => mode.to_string(),
    }
}

fn render_typing(app: &App, now: Instant, area: Rect, buf: &mut Buffer) {
    let session = &app.session;
    let attempt = session.attempt();

    let dim_bold_style = bold().add_modifier(Modifier::DIM);
    let cursor_style = dim_bold_style.add_modifier(Modifier::UNDERLINED);

    let max_chars_per_line = area.width.saturating_sub(HORIZONTAL_MARGIN * 2).max(1);
    let prompt_width = session.text().width();
    let prompt_lines = if prompt_width <= max_chars_per_line as usize {
        1
    } else {
        (prompt_width as f64 / max_chars_per_line as f64).ceil() as u16 + 1
    };
    let padding = area.height.saturating_sub(prompt_lines + 4) / 2;

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .horizontal_margin(HORIZONTAL_MARGIN)
        .constraints([
            Constraint::Length(padding),
            Constraint::Length(2),
            Constraint::Length(prompt_lines),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Min(0),
        ])
        .split(area);

    let mut head = header(app);
    if let Some(left) = session.remaining(now) {
        head = format!("{head} · {:.1}s", left.as_secs_f64());
    }
    Paragraph::new(Span::styled(head, dim_bold_style))
        .alignment(Alignment::Center)
        .render(chunks[1], buf);

    let spans = (0..attempt.len())
        .filter_map(|idx| {
            let expected = attempt.expected_at(idx)?;
            let span = if idx == attempt.cursor() {
                Span::styled(expected.to_string(), cursor_style)
            } else {
                match attempt.state_at(idx) {
                    PositionState::Correct => {
                        Span::styled(expected.to_string(), bold().fg(Color::Green))
                    }
                    // corrected errors stay visible in orange
                    PositionState::Corrected => Span::styled(
                        expected.to_string(),
                        bold().fg(Color::Rgb(255, 165, 0)),
                    ),
                    PositionState::Incorrect => {
                        let typed = match attempt.typed_at(idx) {
                            Some(' ') | None => '·',
                            Some(c) => c,
                        };
                        Span::styled(typed.to_string(), bold().fg(Color::Red))
                    }
                    PositionState::Pending => Span::styled(expected.to_string(), dim_bold_style),
                }
            };
            Some(span)
        })
        .collect::<Vec<Span>>();

    let alignment = if prompt_lines == 1 && app.config.display.center_text {
        Alignment::Center
    } else {
        Alignment::Left
    };
    Paragraph::new(Line::from(spans))
        .alignment(alignment)
        .wrap(Wrap { trim: true })
        .render(chunks[2], buf);

    if session.has_started() {
        Paragraph::new(Span::styled(
            live_line(&session.live_metrics(now)),
            Style::default().fg(Color::Cyan),
        ))
        .alignment(Alignment::Center)
        .render(chunks[3], buf);
    }

    if app.config.display.show_progress_bar && !attempt.is_empty() && !chunks[4].is_empty() {
        Gauge::default()
            .gauge_style(Style::default().fg(Color::Magenta))
            .ratio((attempt.cursor() as f64 / attempt.len() as f64).clamp(0.0, 1.0))
            .label("")
            .render(chunks[4], buf);
    }
}

fn live_line(m: &Metrics) -> String {
    format!(
        "{:.0} wpm   {:.0}% acc   {:.0} cpm",
        m.net_wpm, m.accuracy, m.cpm
    )
}

fn verdict_line(app: &App, outcome: &SessionOutcome) -> Option<Line<'static>> {
    let level = app.level?;
    let line = match outcome.verdict.as_ref()? {
        Verdict::Pass => Line::from(Span::styled(
            format!(
                "level {} cleared! next up: level {}",
                level.number,
                level.number.saturating_add(1)
            ),
            bold().fg(Color::Green),
        )),
        Verdict::Fail(shortfalls) => {
            let reasons = shortfalls
                .iter()
                .map(|s| match s {
                    Shortfall::Speed { required, achieved } => {
                        format!("{achieved:.0}/{required:.0} wpm")
                    }
                    Shortfall::Accuracy { required, achieved } => {
                        format!("{achieved:.0}/{required:.0}% acc")
                    }
                    Shortfall::UncorrectedErrors(n) => format!("{n} uncorrected error(s)"),
                })
                .collect::<Vec<_>>()
                .join(", ");
            Line::from(Span::styled(
                format!("level {} not cleared: {}", level.number, reasons),
                bold().fg(Color::Red),
            ))
        }
    };
    Some(line)
}

fn render_results(app: &App, area: Rect, buf: &mut Buffer) {
    let Some(outcome) = app.outcome.as_ref() else {
        return;
    };
    let m = &outcome.record.metrics;

    let mut lines = vec![
        Line::from(Span::styled(
            format!(
                "{:.0} wpm   {:.0}% acc   {:.0} raw   {:.0} adjusted   {:.0} cpm",
                m.net_wpm, m.accuracy, m.wpm, m.adjusted_wpm, m.cpm
            ),
            bold(),
        )),
        Line::from(format!(
            "{} corrected / {} uncorrected errors   {} backspaces   {:.1} avg word length",
            m.corrected_errors, m.uncorrected_errors, m.backspace_count, m.avg_word_length
        )),
    ];

    if let Some(author) = outcome.record.quote_author.as_deref() {
        lines.push(Line::from(Span::styled(
            format!("by {author}"),
            Style::default().add_modifier(Modifier::ITALIC),
        )));
    }
    if let Some(line) = verdict_line(app, outcome) {
        lines.push(line);
    }
    if let Some(streaks) = outcome.streaks {
        lines.push(Line::from(Span::styled(
            format!(
                "streak: {} day(s)   longest: {} day(s)",
                streaks.current, streaks.longest
            ),
            Style::default().fg(Color::Cyan),
        )));
    }
    for error in &outcome.errors {
        lines.push(Line::from(Span::styled(
            error.clone(),
            Style::default().fg(Color::Red),
        )));
    }

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .horizontal_margin(HORIZONTAL_MARGIN)
        .vertical_margin(VERTICAL_MARGIN)
        .constraints([
            Constraint::Min(1),
            Constraint::Length(lines.len() as u16),
            Constraint::Min(1),
            Constraint::Length(1),
        ])
        .split(area);

    Paragraph::new(lines)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .render(chunks[1], buf);

    Paragraph::new(Span::styled(
        "(r)etry / (n)ext / (esc)ape",
        Style::default().add_modifier(Modifier::ITALIC),
    ))
    .render(chunks[3], buf);
}
