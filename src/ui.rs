use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Widget, Wrap},
};
use unicode_width::UnicodeWidthStr;

use crate::session::{CharOutcome, Session, State};

const HORIZONTAL_MARGIN: u16 = 5;

impl Widget for &Session {
    fn render(self, area: Rect, buf: &mut Buffer) {
        match self.state() {
            State::Results => render_results(self, area, buf),
            _ => render_typing(self, area, buf),
        }
    }
}

fn render_typing(session: &Session, area: Rect, buf: &mut Buffer) {
    let bold = Style::default().add_modifier(Modifier::BOLD);
    let green_bold = bold.fg(Color::Green);
    let red_bold = bold.fg(Color::Red);
    let dim_bold = bold.add_modifier(Modifier::DIM);
    let underlined_dim_bold = dim_bold.add_modifier(Modifier::UNDERLINED);

    let max_chars_per_line = area.width.saturating_sub(HORIZONTAL_MARGIN * 2).max(1);
    let mut prompt_occupied_lines =
        ((session.target.width() as f64 / max_chars_per_line as f64).ceil() + 1.0) as u16;

    if session.target.width() <= max_chars_per_line as usize {
        prompt_occupied_lines = 1;
    }

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .horizontal_margin(HORIZONTAL_MARGIN)
        .constraints([
            Constraint::Length(1),                     // mode banner
            Constraint::Min(1),                        // top padding
            Constraint::Length(prompt_occupied_lines), // target text
            Constraint::Length(2),                     // progress line
            Constraint::Min(1),                        // bottom padding
            Constraint::Length(1),                     // key hints
        ])
        .split(area);

    let mode_label = session
        .mode
        .map(|m| m.to_string())
        .unwrap_or_else(|| "?".to_string());
    let banner = Paragraph::new(Span::styled(format!("typing test ({mode_label})"), dim_bold))
        .alignment(Alignment::Center);
    banner.render(chunks[0], buf);

    // One span per typed character: the expected char in green when it
    // matched, the typed char in red when it didn't (wrong spaces shown as
    // a middle dot so they stay visible).
    let outcomes = session.char_outcomes();
    let mut spans = session
        .input
        .chars()
        .zip(outcomes.iter())
        .enumerate()
        .map(|(idx, (typed, outcome))| match outcome {
            CharOutcome::Incorrect => Span::styled(
                match typed {
                    ' ' => "·".to_owned(),
                    c => c.to_string(),
                },
                red_bold,
            ),
            _ => Span::styled(session.target[idx..idx + 1].to_string(), green_bold),
        })
        .collect::<Vec<Span>>();

    let cursor = session.cursor_pos();
    if cursor < session.target.len() {
        spans.push(Span::styled(
            session.target[cursor..cursor + 1].to_string(),
            underlined_dim_bold,
        ));
        spans.push(Span::styled(
            session.target[cursor + 1..].to_string(),
            dim_bold,
        ));
    }

    let prompt = Paragraph::new(Line::from(spans))
        .alignment(if prompt_occupied_lines == 1 {
            Alignment::Center
        } else {
            Alignment::Left
        })
        .wrap(Wrap { trim: true });
    prompt.render(chunks[2], buf);

    let (typed, total) = session.progress();
    let mut status = format!("{typed}/{total} chars   {:.1}% acc", session.accuracy());
    if session.has_started() {
        status.push_str(&format!("   {:.1}s", session.elapsed().as_secs_f64()));
    }
    let status = Paragraph::new(Span::styled(status, bold)).alignment(Alignment::Center);
    status.render(chunks[3], buf);

    let hints = Paragraph::new(Span::styled(
        "esc quit   backspace delete   enter finish",
        dim_bold,
    ))
    .alignment(Alignment::Center);
    hints.render(chunks[5], buf);
}

fn render_results(session: &Session, area: Rect, buf: &mut Buffer) {
    let bold = Style::default().add_modifier(Modifier::BOLD);
    let dim_bold = bold.add_modifier(Modifier::DIM);
    let italic = Style::default().add_modifier(Modifier::ITALIC);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .horizontal_margin(HORIZONTAL_MARGIN)
        .constraints([
            Constraint::Min(1),    // top padding
            Constraint::Length(1), // headline stats
            Constraint::Length(1), // padding
            Constraint::Length(2), // target text
            Constraint::Length(2), // typed text
            Constraint::Min(1),    // bottom padding
            Constraint::Length(1), // key hints
        ])
        .split(area);

    let (typed, _) = session.progress();
    let stats = Paragraph::new(Span::styled(
        format!(
            "{:.2}s   {} wpm   {:.1}% acc   {}/{} chars correct",
            session.elapsed().as_secs_f64(),
            session.wpm(),
            session.accuracy(),
            session.correct_char_count(),
            typed,
        ),
        bold,
    ))
    .alignment(Alignment::Center);
    stats.render(chunks[1], buf);

    let target = Paragraph::new(Line::from(vec![
        Span::styled("target  ", dim_bold),
        Span::styled(session.target.clone(), italic),
    ]))
    .wrap(Wrap { trim: true });
    target.render(chunks[3], buf);

    let input = Paragraph::new(Line::from(vec![
        Span::styled("typed   ", dim_bold),
        Span::styled(session.input.clone(), italic),
    ]))
    .wrap(Wrap { trim: true });
    input.render(chunks[4], buf);

    let hints = Paragraph::new(Span::styled(
        "any key to go again   (m) change mode   (q) quit",
        dim_bold,
    ))
    .alignment(Alignment::Center);
    hints.render(chunks[6], buf);
}
