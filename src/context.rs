use crate::sim::Board;
use log::warn;
use ratatui::{layout::Size, style::Color};
use std::time::Duration;

pub const BOARD_WIDTH: i32 = 800;
pub const BOARD_HEIGHT: i32 = 600;
pub const CELL_SIZE: i32 = 20;
pub const TICKS_PER_SECOND: u64 = 10;
pub const LOG_FILE: &str = "snekpal.log";

/// Terminal columns used to draw one board cell, so tiles look square.
pub const TILE_WIDTH: u16 = 2;

/// Glyphs and colours used to draw a session.
#[derive(Clone, Debug, PartialEq)]
pub struct Theme {
    pub snake_symbol: &'static str,
    pub snake_color: Color,
    pub food_symbol: &'static str,
    pub food_color: Color,
    pub background: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Theme {
            snake_symbol: "██",
            snake_color: Color::Green,
            food_symbol: "██",
            food_color: Color::Rgb(255, 0, 0),
            background: Color::Black,
        }
    }
}

/// Everything a play session needs that isn't simulation state.
#[derive(Clone, Debug, PartialEq)]
pub struct Context {
    pub board: Board,
    pub tick_rate: Duration,
    pub theme: Theme,
}

impl Default for Context {
    fn default() -> Self {
        Context {
            board: Board::new(BOARD_WIDTH, BOARD_HEIGHT, CELL_SIZE),
            tick_rate: Duration::from_millis(1000 / TICKS_PER_SECOND),
            theme: Theme::default(),
        }
    }
}

impl Context {
    /// Shrinks the board to the largest whole number of cells that fits in
    /// `area` terminal cells. Never grows past the default board.
    pub fn fit_to(&self, area: Size) -> Context {
        let board = self.board;
        let cols = board.cols().min(i32::from(area.width / TILE_WIDTH)).max(1);
        let rows = board.rows().min(i32::from(area.height)).max(1);

        if cols < board.cols() || rows < board.rows() {
            warn!(
                "Terminal area {}x{} is too small for a {}x{} board, playing on {}x{}",
                area.width,
                area.height,
                board.cols(),
                board.rows(),
                cols,
                rows
            );
        }

        Context {
            board: Board::new(cols * board.cell_size, rows * board.cell_size, board.cell_size),
            tick_rate: self.tick_rate,
            theme: self.theme.clone(),
        }
    }

    /// Terminal area needed to draw the whole board.
    pub fn board_size(&self) -> Size {
        Size {
            width: self.board.cols() as u16 * TILE_WIDTH,
            height: self.board.rows() as u16,
        }
    }
}
