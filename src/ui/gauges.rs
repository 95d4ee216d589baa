use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Layout, Rect};
use ratatui::style::Style;
use ratatui::widgets::{Block, Borders, Gauge, Paragraph};
use unicode_width::UnicodeWidthStr;

use crate::format::truncate_unicode;
use crate::system::snapshot::UtilizationSnapshot;
use crate::ui::theme::{BorderStyle, Theme};

const LABEL_WIDTH: u16 = 12;
pub const UNAVAILABLE: &str = "n/a";

/// Gauge-safe ratio; anything non-finite draws as empty.
pub fn gauge_ratio(value: f64) -> f64 {
    if value.is_finite() {
        value.clamp(0.0, 1.0)
    } else {
        0.0
    }
}

pub fn render_cpu(
    frame: &mut Frame,
    area: Rect,
    snapshot: &UtilizationSnapshot,
    theme: &Theme,
    border_style: BorderStyle,
) {
    let value = snapshot
        .cpu_available
        .then(|| format!("{}%", snapshot.cpu_usage_percent as i64));
    render_row(
        frame,
        area,
        "CPU Usage:",
        gauge_ratio(snapshot.cpu_usage_percent / 100.0),
        value,
        theme,
        border_style,
    );
}

pub fn render_memory(
    frame: &mut Frame,
    area: Rect,
    snapshot: &UtilizationSnapshot,
    theme: &Theme,
    border_style: BorderStyle,
) {
    let value = snapshot
        .memory_available
        .then(|| snapshot.memory_label.clone());
    render_row(
        frame,
        area,
        "Memory:",
        gauge_ratio(snapshot.memory.fraction),
        value,
        theme,
        border_style,
    );
}

fn render_row(
    frame: &mut Frame,
    area: Rect,
    label: &str,
    ratio: f64,
    value: Option<String>,
    theme: &Theme,
    border_style: BorderStyle,
) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(border_style.border_type())
        .border_style(Style::default().fg(theme.border));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let (value_text, value_color) = match value {
        Some(text) => (text, theme.text_primary),
        None => (UNAVAILABLE.to_string(), theme.unavailable),
    };
    // One column of padding between the gauge and the value.
    let value_width = (value_text.width() as u16 + 1).min(inner.width / 2);
    let [label_area, gauge_area, value_area] = Layout::horizontal([
        Constraint::Length(LABEL_WIDTH.min(inner.width / 4)),
        Constraint::Min(0),
        Constraint::Length(value_width),
    ])
    .areas(inner);

    frame.render_widget(
        Paragraph::new(truncate_unicode(label, label_area.width as usize))
            .style(Style::default().fg(theme.text_secondary)),
        label_area,
    );

    let gauge = Gauge::default()
        .gauge_style(
            Style::default()
                .fg(theme.heat_color(ratio))
                .bg(theme.gauge_unfilled),
        )
        .ratio(ratio)
        .label("");
    frame.render_widget(gauge, gauge_area);

    frame.render_widget(
        Paragraph::new(truncate_unicode(&value_text, value_area.width as usize))
            .alignment(Alignment::Right)
            .style(Style::default().fg(value_color)),
        value_area,
    );
}
