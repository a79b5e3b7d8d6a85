use crate::context::Context;
use crate::input::Command;
use crate::menu::{self, Menu, Transition, GAME_OVER_BUTTONS, PAL_BUTTONS, TITLE_BUTTONS};
use crate::sim::{Direction, SimulationState, StepOutcome};
use crate::ui;
use crossterm::event::{Event, MouseButton, MouseEvent, MouseEventKind};
use log::info;
use rand::Rng;
use ratatui::{
    layout::{Position, Rect, Size},
    prelude::*,
    widgets::*,
};
use std::time::Duration;

/// One play session: the simulation plus the context it runs in. Dropped
/// when the player leaves the game over screen.
#[derive(Clone, Debug, PartialEq)]
pub struct Session {
    pub ctx: Context,
    pub sim: SimulationState,
}

#[derive(Debug)]
pub enum Screen {
    Title(Menu),
    Pal(Menu),
    Playing(Session),
    Paused(Session),
    GameOver { session: Session, menu: Menu },
    Exit,
}

pub struct App<R = rand::rngs::ThreadRng> {
    pub screen: Screen,
    ctx: Context,
    rng: R,
    /// Size of the last drawn frame.
    area: Rect,
    /// First turn pressed since the last tick.
    pending: Option<Direction>,
}

impl App<rand::rngs::ThreadRng> {
    pub fn new(ctx: Context) -> Self {
        App::with_rng(ctx, rand::thread_rng())
    }
}

impl<R: Rng> App<R> {
    pub fn with_rng(ctx: Context, rng: R) -> Self {
        App {
            screen: Screen::Title(Menu::new(&TITLE_BUTTONS)),
            ctx,
            rng,
            area: Rect::default(),
            pending: None,
        }
    }

    pub fn tick_rate(&self) -> Duration {
        match &self.screen {
            Screen::Playing(session) | Screen::Paused(session) => session.ctx.tick_rate,
            _ => self.ctx.tick_rate,
        }
    }

    pub fn should_exit(&self) -> bool {
        matches!(self.screen, Screen::Exit)
    }

    pub fn handle_event(&mut self, event: Event) {
        match event {
            Event::Key(key) => {
                if let Some(command) = Command::from_key_event(key) {
                    self.handle_command(command);
                }
            }
            Event::Mouse(mouse) => self.handle_mouse(mouse),
            _ => {}
        }
    }

    fn handle_command(&mut self, command: Command) {
        let screen = std::mem::replace(&mut self.screen, Screen::Exit);
        let next = match (screen, command) {
            (_, Command::Exit) => self.enter(Transition::Quit),
            (Screen::Title(_), Command::Confirm) => self.enter(Transition::NewGame),
            (Screen::Title(_), Command::Back) => self.enter(Transition::Quit),
            (Screen::Pal(_), Command::Back | Command::Confirm) => self.enter(Transition::Title),
            (Screen::Playing(session), Command::Turn(direction)) => {
                // Keys that would not turn the snake don't use up the tick
                let heading = session.sim.direction;
                let turns = direction != heading && direction != heading.opposite();
                if self.pending.is_none() && turns {
                    self.pending = Some(direction);
                }
                Screen::Playing(session)
            }
            (Screen::Playing(session), Command::Confirm) => {
                info!("Paused");
                Screen::Paused(session)
            }
            (Screen::Paused(session), Command::Confirm) => {
                info!("Resumed");
                Screen::Playing(session)
            }
            (Screen::Playing(_) | Screen::Paused(_), Command::Back) => {
                self.enter(Transition::Title)
            }
            (Screen::GameOver { .. }, Command::Confirm) => self.enter(Transition::NewGame),
            (Screen::GameOver { .. }, Command::Back) => self.enter(Transition::Title),
            (screen, _) => screen,
        };
        self.screen = next;
    }

    fn handle_mouse(&mut self, mouse: MouseEvent) {
        let pos = Position::new(mouse.column, mouse.row);
        let arena = ui::arena(self.area);
        let (menu, area) = match &mut self.screen {
            Screen::Title(menu) | Screen::Pal(menu) => (menu, self.area),
            Screen::GameOver { menu, .. } => (menu, arena),
            _ => return,
        };

        let transition = match mouse.kind {
            MouseEventKind::Moved => {
                menu.pointer_moved(area, pos);
                None
            }
            MouseEventKind::Up(MouseButton::Left) => menu.click(area, pos),
            _ => None,
        };

        if let Some(transition) = transition {
            self.screen = self.enter(transition);
        }
    }

    fn enter(&mut self, transition: Transition) -> Screen {
        info!("Entering {:?}", transition);
        self.pending = None;
        match transition {
            Transition::NewGame => Screen::Playing(self.new_session()),
            Transition::Title => Screen::Title(Menu::new(&TITLE_BUTTONS)),
            Transition::Pal => Screen::Pal(Menu::new(&PAL_BUTTONS)),
            Transition::Quit => Screen::Exit,
        }
    }

    fn new_session(&mut self) -> Session {
        let arena = ui::arena(self.area);
        let ctx = self.ctx.fit_to(Size {
            width: arena.width,
            height: arena.height,
        });
        info!(
            "Starting session on a {}x{} board",
            ctx.board.cols(),
            ctx.board.rows()
        );
        let sim = SimulationState::new(ctx.board, &mut self.rng);
        Session { ctx, sim }
    }

    /// Runs one simulation tick if a game is in progress and the whole board
    /// is visible.
    pub fn update(&mut self) {
        let screen = std::mem::replace(&mut self.screen, Screen::Exit);
        self.screen = match screen {
            Screen::Playing(session) if !fits(self.area, &session) => Screen::Playing(session),
            Screen::Playing(mut session) => {
                let candidate = self.pending.take();
                match session.sim.step(candidate, session.ctx.board, &mut self.rng) {
                    StepOutcome::HitWall | StepOutcome::Ended => {
                        info!("Game over, final length {}", session.sim.snake.len());
                        Screen::GameOver {
                            session,
                            menu: Menu::new(&GAME_OVER_BUTTONS),
                        }
                    }
                    StepOutcome::Moved | StepOutcome::Ate => Screen::Playing(session),
                }
            }
            other => other,
        };
    }

    pub fn render(&mut self, frame: &mut Frame) {
        self.area = frame.area();
        let area = self.area;

        match &self.screen {
            Screen::Title(buttons) => {
                ui::fill(area, frame.buffer_mut(), menu::BLUE);
                frame.render_widget(
                    Paragraph::new("SNAKE GAME")
                        .style(Style::default().fg(menu::WHITE).bg(menu::BLUE).bold())
                        .alignment(Alignment::Center),
                    line_at(area, area.height / 4),
                );
                frame.render_widget(buttons, area);
            }
            Screen::Pal(buttons) => {
                ui::fill(area, frame.buffer_mut(), menu::WHITE);
                let bar = Rect::new(area.x, area.y, area.width, area.height / 5);
                ui::fill(bar, frame.buffer_mut(), menu::ORANGE);
                let theme = &self.ctx.theme;
                frame.render_widget(
                    Paragraph::new(theme.snake_symbol.repeat(3))
                        .style(Style::default().fg(theme.snake_color).bg(menu::WHITE))
                        .alignment(Alignment::Center),
                    line_at(area, area.height / 2),
                );
                frame.render_widget(
                    Paragraph::new("Python Pal")
                        .style(Style::default().fg(menu::BROWN).bg(menu::WHITE))
                        .alignment(Alignment::Center),
                    line_at(area, area.height / 2 + 2),
                );
                frame.render_widget(buttons, area);
            }
            Screen::Playing(session) => {
                let title = if fits(area, session) {
                    "Playing"
                } else {
                    "Terminal too small. Enlarge it to continue"
                };
                render_session(frame, area, session, Block::bordered().title(title));
            }
            Screen::Paused(session) => {
                render_session(
                    frame,
                    area,
                    session,
                    Block::bordered().title("Paused. Press SPACE to continue"),
                );
            }
            Screen::GameOver {
                session,
                menu: buttons,
            } => {
                let inner = render_session(frame, area, session, Block::bordered());
                frame.render_widget(
                    Paragraph::new(format!(
                        "GAME OVER\nFinal length: {}\nPress SPACE to play again",
                        session.sim.snake.len()
                    ))
                    .alignment(Alignment::Center),
                    inner,
                );
                frame.render_widget(buttons, inner);
            }
            Screen::Exit => {}
        }
    }
}

/// Single row `offset` rows down from the top of `area`.
fn line_at(area: Rect, offset: u16) -> Rect {
    let offset = offset.min(area.height.saturating_sub(1));
    Rect::new(area.x, area.y + offset, area.width, 1.min(area.height))
}

/// Whether a frame of size `area` shows the session's whole board.
fn fits(area: Rect, session: &Session) -> bool {
    let arena = ui::arena(area);
    let board = session.ctx.board_size();
    arena.width >= board.width && arena.height >= board.height
}

/// Draws the header and the board; returns the area inside the border.
fn render_session(frame: &mut Frame, area: Rect, session: &Session, block: Block) -> Rect {
    let (header, game) = ui::split(area);
    frame.render_widget(
        Paragraph::new(format!("SNEK    Length: {}", session.sim.snake.len()))
            .alignment(Alignment::Left)
            .block(Block::bordered()),
        header,
    );

    let inner = block.inner(game);
    frame.render_widget(block, game);
    frame.render_widget(session, inner);
    inner
}
