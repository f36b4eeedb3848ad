//! Layout and drawing: board, sidebar, button bar.

use crate::game::{GameState, Phase};
use crate::input::Button;
use crate::piece::Cell;
use crate::theme::{Theme, color_name};
use ratatui::Frame;
use ratatui::buffer::Buffer;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Position, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Widget};
use std::time::Instant;
use tachyonfx::{Duration as TfxDuration, Effect, EffectRenderer, Interpolation, fx};

/// Each board cell is two terminal columns wide so blocks look square.
const CELL_WIDTH: u16 = 2;
const CELL_HEIGHT: u16 = 1;
const SIDEBAR_WIDTH: u16 = 26;
const BUTTON_BAR_HEIGHT: u16 = 3;

/// Duration of the board fade-in when a game starts.
const START_FADE_MS: u32 = 350;

/// Screen regions for a given terminal area; shared by drawing and mouse hit-testing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScreenLayout {
    /// Board including its border.
    pub board: Rect,
    /// Board cells only.
    pub board_inner: Rect,
    pub sidebar: Rect,
    pub buttons: [(Button, Rect); 5],
}

impl ScreenLayout {
    /// Board centred in `area`, sidebar on its right, button bar underneath.
    pub fn new(area: Rect, width: usize, height: usize) -> Self {
        let board_w = width as u16 * CELL_WIDTH + 2;
        let board_h = height as u16 * CELL_HEIGHT + 2;
        let total_w = board_w + SIDEBAR_WIDTH;
        let total_h = board_h + BUTTON_BAR_HEIGHT;

        let horiz = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Fill(1),
                Constraint::Length(total_w),
                Constraint::Fill(1),
            ])
            .split(area);
        let vert = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Fill(1),
                Constraint::Length(total_h),
                Constraint::Fill(1),
            ])
            .split(horiz[1]);
        let active = vert[1];

        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Length(board_w), Constraint::Length(SIDEBAR_WIDTH)])
            .split(active);
        let left = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(board_h),
                Constraint::Length(BUTTON_BAR_HEIGHT),
            ])
            .split(columns[0]);

        let board = left[0];
        let board_inner = Rect {
            x: board.x + 1,
            y: board.y + 1,
            width: board.width.saturating_sub(2),
            height: board.height.saturating_sub(2),
        };
        let bar = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Fill(1),
                Constraint::Fill(1),
                Constraint::Fill(1),
                Constraint::Fill(1),
                Constraint::Fill(2),
            ])
            .split(left[1]);
        let buttons = [0, 1, 2, 3, 4].map(|i| (Button::ALL[i], bar[i]));

        Self {
            board,
            board_inner,
            sidebar: columns[1],
            buttons,
        }
    }

    /// Button under the terminal cell (column, row), if any.
    pub fn button_at(&self, column: u16, row: u16) -> Option<Button> {
        let pos = Position::new(column, row);
        self.buttons
            .iter()
            .find(|(_, rect)| rect.contains(pos))
            .map(|&(b, _)| b)
    }
}

/// Fade the board in from the background colour.
pub fn start_fade(theme: &Theme) -> Effect {
    fx::fade_from(theme.bg, theme.bg, (START_FADE_MS, Interpolation::Linear))
}

/// Draw the whole screen. `start_effect` is advanced by the time since the last frame.
pub fn draw(
    frame: &mut Frame,
    state: &GameState,
    theme: &Theme,
    start_effect: &mut Option<Effect>,
    effect_process_time: &mut Option<Instant>,
    now: Instant,
) {
    let arena = state.arena();
    let layout = ScreenLayout::new(frame.area(), arena.width(), arena.height());

    draw_board(frame.buffer_mut(), state, theme, &layout);
    draw_sidebar(frame.buffer_mut(), state, theme, layout.sidebar);
    draw_buttons(frame.buffer_mut(), state.is_running(), theme, &layout);

    if let Some(effect) = start_effect {
        let delta = effect_process_time
            .map(|t| now.saturating_duration_since(t))
            .unwrap_or(std::time::Duration::ZERO);
        let delta_ms = delta.as_millis().min(u32::MAX as u128) as u32;
        *effect_process_time = Some(now);
        frame.render_effect(effect, layout.board_inner, TfxDuration::from_millis(delta_ms));
    }
}

/// Background first; grid and piece only while running.
fn draw_board(buf: &mut Buffer, state: &GameState, theme: &Theme, layout: &ScreenLayout) {
    Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.border))
        .title(Span::styled(" blocktui ", Style::default().fg(theme.title)))
        .style(Style::default().bg(theme.bg))
        .render(layout.board, buf);

    if !state.is_running() {
        return;
    }

    for (y, row) in state.arena().rows().enumerate() {
        for (x, &cell) in row.iter().enumerate() {
            draw_cell(buf, theme, layout.board_inner, x as i32, y as i32, cell);
        }
    }
    if let Some(player) = state.player() {
        for (x, y, _) in player.matrix.occupied() {
            draw_cell(
                buf,
                theme,
                layout.board_inner,
                x as i32 + player.pos.x,
                y as i32 + player.pos.y,
                player.color,
            );
        }
    }
}

/// One unit square at board coordinates; empty cells and off-board cells are skipped.
fn draw_cell(buf: &mut Buffer, theme: &Theme, board: Rect, x: i32, y: i32, cell: Cell) {
    let Some(color) = theme.cell_color(cell) else {
        return;
    };
    if x < 0 || y < 0 {
        return;
    }
    let rx = board.x + x as u16 * CELL_WIDTH;
    let ry = board.y + y as u16 * CELL_HEIGHT;
    if rx + CELL_WIDTH > board.x + board.width || ry >= board.y + board.height {
        return;
    }
    buf.set_string(rx, ry, "██", Style::default().fg(color).bg(theme.bg));
}

fn draw_sidebar(buf: &mut Buffer, state: &GameState, theme: &Theme, area: Rect) {
    let title_style = Style::default().fg(theme.title);
    let fg_style = Style::default().fg(theme.main_fg);
    let (status, status_color) = match state.phase() {
        Phase::Running => ("Running", Color::Green),
        Phase::Stopped => ("Stopped", Color::Red),
    };
    let piece = state.player().map_or_else(
        || "-".to_string(),
        |p| format!("{} ({})", p.kind.token(), color_name(p.color).unwrap_or("?")),
    );
    let help = |key: &'static str, what: &'static str| {
        Line::from(vec![
            Span::styled(format!(" {key:<8}"), title_style),
            Span::styled(what, fg_style),
        ])
    };
    let lines = vec![
        Line::from(vec![
            Span::styled(" Status: ", title_style),
            Span::styled(
                status,
                Style::default()
                    .fg(status_color)
                    .add_modifier(Modifier::BOLD),
            ),
        ]),
        Line::from(vec![
            Span::styled(" Piece:  ", title_style),
            Span::styled(piece, fg_style),
        ]),
        Line::from(vec![
            Span::styled(" Gravity: ", title_style),
            Span::styled(format!("{} ms", state.drop_interval().as_millis()), fg_style),
        ]),
        Line::from(""),
        help("←/→", "Move"),
        help("↓", "Drop"),
        help("↑", "Rotate CW"),
        help("Q", "Rotate CCW"),
        help("S/Enter", "Start/Stop"),
        help("Esc", "Quit"),
        Line::from(""),
        Line::from(Span::styled(" Click the buttons below", fg_style)),
        Line::from(Span::styled(" the board too.", fg_style)),
    ];
    Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(theme.border)),
        )
        .render(area, buf);
}

fn draw_buttons(buf: &mut Buffer, running: bool, theme: &Theme, layout: &ScreenLayout) {
    for &(button, rect) in &layout.buttons {
        let style = match button {
            Button::StartStop if running => Style::default()
                .fg(Color::White)
                .bg(Color::Red)
                .add_modifier(Modifier::BOLD),
            _ => Style::default().fg(theme.main_fg),
        };
        Paragraph::new(Line::from(button.label(running)))
            .alignment(Alignment::Center)
            .style(style)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(theme.border)),
            )
            .render(rect, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::piece::PieceKind;

    fn area() -> Rect {
        Rect::new(0, 0, 100, 30)
    }

    #[test]
    fn test_layout_board_size() {
        let layout = ScreenLayout::new(area(), 12, 20);
        assert_eq!(layout.board.width, 26);
        assert_eq!(layout.board.height, 22);
        assert_eq!(layout.board_inner.width, 24);
        assert_eq!(layout.board_inner.height, 20);
        assert_eq!(layout.sidebar.x, layout.board.x + layout.board.width);
    }

    #[test]
    fn test_button_hit_testing() {
        let layout = ScreenLayout::new(area(), 12, 20);
        for (button, rect) in layout.buttons {
            assert_eq!(layout.button_at(rect.x, rect.y + 1), Some(button));
        }
        assert_eq!(layout.button_at(layout.board.x + 3, layout.board.y + 3), None);
        let last = layout.buttons[4].1;
        assert_eq!(last.x + last.width, layout.board.x + layout.board.width);
    }

    fn render(state: &GameState, theme: &Theme) -> (Buffer, ScreenLayout) {
        let layout = ScreenLayout::new(area(), state.arena().width(), state.arena().height());
        let mut buf = Buffer::empty(area());
        draw_board(&mut buf, state, theme, &layout);
        (buf, layout)
    }

    fn cell_fg(buf: &Buffer, layout: &ScreenLayout, x: u16, y: u16) -> Color {
        let pos = (
            layout.board_inner.x + x * CELL_WIDTH,
            layout.board_inner.y + y * CELL_HEIGHT,
        );
        buf[pos].fg
    }

    #[test]
    fn test_stopped_board_is_blank() {
        let theme = Theme::default();
        let state = GameState::with_seed(12, 20, 9).unwrap();
        let (buf, layout) = render(&state, &theme);
        let inner = layout.board_inner;
        for y in inner.y..inner.y + inner.height {
            for x in inner.x..inner.x + inner.width {
                assert_eq!(buf[(x, y)].symbol(), " ");
                assert_eq!(buf[(x, y)].bg, theme.bg);
            }
        }
    }

    #[test]
    fn test_running_board_draws_piece() {
        let theme = Theme::default();
        let mut state = GameState::with_seed(12, 20, 9).unwrap();
        state.start();
        state.spawn_kind(PieceKind::O);
        let (buf, layout) = render(&state, &theme);
        let yellow = theme.cell_color(1).unwrap();
        assert_eq!(cell_fg(&buf, &layout, 5, 0), yellow);
        assert_eq!(cell_fg(&buf, &layout, 6, 1), yellow);
        let inner = layout.board_inner;
        assert_eq!(buf[(inner.x + 10, inner.y)].symbol(), "█");
        assert_eq!(buf[(inner.x, inner.y)].symbol(), " ");
    }
}
