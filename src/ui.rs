use crate::app::Session;
use crate::context::TILE_WIDTH;
use ratatui::{
    buffer::Buffer,
    layout::{self, Constraint, Layout, Rect},
    style::{Color, Style},
    widgets::{Block, Widget},
};

/// Title bar on top, bordered game area below.
pub fn split(area: Rect) -> (Rect, Rect) {
    let layout = Layout::default()
        .direction(layout::Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Title + length
            Constraint::Min(0),    // Game area
        ])
        .split(area);
    (layout[0], layout[1])
}

/// Where the board is drawn for a frame of size `area`.
pub fn arena(area: Rect) -> Rect {
    let (_, game) = split(area);
    Block::bordered().inner(game)
}

pub fn fill(area: Rect, buf: &mut Buffer, color: Color) {
    buf.set_style(area, Style::default().bg(color));
}

impl Widget for &Session {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let board = self.ctx.board;
        let theme = &self.ctx.theme;
        let size = self.ctx.board_size();
        let board_area = Rect::new(area.x, area.y, size.width, size.height).intersection(area);

        fill(board_area, buf, theme.background);

        let mut draw_tile = |col: i32, row: i32, symbol: &str, color: Color| {
            if col < 0 || row < 0 || col >= board.cols() || row >= board.rows() {
                return;
            }
            let x = board_area.x + col as u16 * TILE_WIDTH;
            let y = board_area.y + row as u16;
            if x + TILE_WIDTH > board_area.right() || y >= board_area.bottom() {
                return;
            }
            buf.set_string(
                x,
                y,
                symbol,
                Style::default().fg(color).bg(theme.background),
            );
        };

        for cell in self.sim.snake.segments() {
            draw_tile(
                cell.col(board.cell_size),
                cell.row(board.cell_size),
                theme.snake_symbol,
                theme.snake_color,
            );
        }

        let food = self.sim.food;
        draw_tile(
            food.col(board.cell_size),
            food.row(board.cell_size),
            theme.food_symbol,
            theme.food_color,
        );
    }
}
