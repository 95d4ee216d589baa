use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Bar, BarChart, BarGroup, Block, Borders};

use crate::system::snapshot::CoreUsage;
use crate::ui::gauges::gauge_ratio;
use crate::ui::theme::{BorderStyle, Theme};

const MAX_BAR_WIDTH: u16 = 5;
const BAR_GAP: u16 = 1;

/// One vertical bar per tracked core, scaled 0..=100.
pub fn render(
    frame: &mut Frame,
    area: Rect,
    cores: &[CoreUsage],
    theme: &Theme,
    border_style: BorderStyle,
) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(border_style.border_type())
        .border_style(Style::default().fg(theme.border))
        .title(Span::styled(
            format!(" Cores ({}) ", cores.len()),
            Style::default()
                .fg(theme.text_secondary)
                .add_modifier(Modifier::BOLD),
        ));
    let inner_width = block.inner(area).width;

    let bars: Vec<Bar> = cores
        .iter()
        .map(|core| {
            let ratio = gauge_ratio(core.fraction);
            Bar::default()
                .value((ratio * 100.0).round() as u64)
                .label(Line::from(core.id.to_string()))
                .text_value(String::new())
                .style(Style::default().fg(theme.heat_color(ratio)))
        })
        .collect();

    let chart = BarChart::default()
        .block(block)
        .data(BarGroup::default().bars(&bars))
        .bar_width(bar_width(inner_width, cores.len()))
        .bar_gap(BAR_GAP)
        .max(100);

    frame.render_widget(chart, area);
}

/// Widest bar that still fits every core, capped for readability.
pub fn bar_width(available: u16, count: usize) -> u16 {
    if count == 0 {
        return 1;
    }
    let count = u16::try_from(count).unwrap_or(u16::MAX);
    let gaps = BAR_GAP.saturating_mul(count.saturating_sub(1));
    (available.saturating_sub(gaps) / count).clamp(1, MAX_BAR_WIDTH)
}
