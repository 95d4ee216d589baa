use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::system::snapshot::UtilizationSnapshot;
use crate::ui::theme::Theme;

/// Source warnings first, then key hints.
pub fn render(
    frame: &mut Frame,
    area: Rect,
    snapshot: &UtilizationSnapshot,
    hints: &[(String, &str)],
    theme: &Theme,
) {
    let bg_style = Style::default().bg(theme.statusbar_bg);

    let mut spans = Vec::new();
    for source in unavailable_sources(snapshot) {
        spans.push(Span::styled(
            format!(" {source} unavailable "),
            Style::default()
                .fg(theme.unavailable)
                .add_modifier(Modifier::BOLD),
        ));
    }
    for (key, desc) in hints {
        spans.extend(pill_spans(key, desc, theme));
    }

    frame.render_widget(Paragraph::new(Line::from(spans)).style(bg_style), area);
}

pub fn unavailable_sources(snapshot: &UtilizationSnapshot) -> Vec<&'static str> {
    let mut out = Vec::new();
    if !snapshot.cpu_available {
        out.push("CPU");
    }
    if !snapshot.memory_available {
        out.push("Memory");
    }
    out
}

fn pill_spans<'a>(key: &'a str, desc: &'a str, theme: &Theme) -> Vec<Span<'a>> {
    vec![
        Span::raw(" "),
        Span::styled(
            format!(" {key} "),
            Style::default()
                .fg(theme.pill_key_fg)
                .bg(theme.pill_key_bg)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(format!(" {desc}"), Style::default().fg(theme.pill_desc_fg)),
    ]
}
