use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::Span;
use ratatui::widgets::Paragraph;
use unicode_width::UnicodeWidthStr;

use crate::format::{format_uptime, truncate_unicode};
use crate::ui::theme::Theme;

pub const TITLE: &str = "System Monitor";

/// Title on the left, uptime pinned to the right edge.
pub fn render(frame: &mut Frame, area: Rect, uptime_seconds: i64, theme: &Theme) {
    let uptime = format_uptime(uptime_seconds);
    let uptime_width = (uptime.width() as u16).min(area.width);
    let [title_area, uptime_area] =
        Layout::horizontal([Constraint::Min(0), Constraint::Length(uptime_width)]).areas(area);

    let title = Span::styled(
        truncate_unicode(TITLE, title_area.width as usize),
        Style::default()
            .fg(theme.title_fg)
            .add_modifier(Modifier::BOLD),
    );
    frame.render_widget(Paragraph::new(title), title_area);
    frame.render_widget(
        Paragraph::new(Span::styled(
            uptime,
            Style::default().fg(theme.text_secondary),
        )),
        uptime_area,
    );
}
