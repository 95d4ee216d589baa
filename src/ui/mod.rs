pub mod cores;
pub mod gauges;
pub mod header;
pub mod statusbar;
pub mod theme;

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::style::{Modifier, Style};
use ratatui::text::Line;
use ratatui::widgets::{Block, Borders};

use crate::app::App;

const CORES_HEIGHT: u16 = 8;

pub fn draw(frame: &mut Frame, app: &App) {
    let _span = tracing::trace_span!("ui.draw").entered();

    let theme = &app.theme;
    let outer = Block::default()
        .borders(Borders::ALL)
        .border_type(app.border_style.border_type())
        .border_style(Style::default().fg(theme.border))
        .title_bottom(
            Line::styled(
                format!(" {} ", app.quit_hint()),
                Style::default()
                    .fg(theme.text_secondary)
                    .add_modifier(Modifier::DIM),
            )
            .centered(),
        );
    let inner = outer.inner(frame.area());
    frame.render_widget(outer, frame.area());

    let show_cores = app.show_cores && !app.snapshot.cores.is_empty();
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(3),
            Constraint::Length(if show_cores { CORES_HEIGHT } else { 0 }),
            Constraint::Length(3),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .split(inner);

    let snapshot = &app.snapshot;
    header::render(frame, chunks[0], snapshot.uptime_seconds, theme);
    gauges::render_cpu(frame, chunks[1], snapshot, theme, app.border_style);
    if show_cores {
        cores::render(frame, chunks[2], &snapshot.cores, theme, app.border_style);
    }
    gauges::render_memory(frame, chunks[3], snapshot, theme, app.border_style);
    statusbar::render(
        frame,
        chunks[5],
        snapshot,
        &app.keybinds.hint_entries(),
        theme,
    );
}
