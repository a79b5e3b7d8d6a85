//! Clickable text buttons.
//!
//! Every screen's buttons are plain data: a static list of [`Button`]
//! records. [`Menu`] does hover tracking and hit-testing over such a list and
//! renders it; it knows nothing about what a transition does.

use ratatui::{
    buffer::Buffer,
    layout::{Position, Rect},
    style::{Color, Modifier, Style},
    text::Line,
    widgets::Widget,
};

pub const BLUE: Color = Color::Rgb(106, 159, 181);
pub const WHITE: Color = Color::Rgb(255, 255, 255);
pub const PINK: Color = Color::Rgb(227, 193, 232);
pub const BROWN: Color = Color::Rgb(125, 110, 79);
pub const ORANGE: Color = Color::Rgb(255, 165, 0);

/// Where a button click leads.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Transition {
    NewGame,
    Title,
    Pal,
    Quit,
}

/// A text button centred on a point given as percentages of the screen.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Button {
    pub label: &'static str,
    /// Centre as (percent of width, percent of height).
    pub centre: (u16, u16),
    /// Every 10 points of font size adds a column of padding each side.
    pub font_size: u16,
    pub fg: Color,
    pub bg: Color,
    pub action: Option<Transition>,
}

impl Button {
    /// Rect the button occupies inside `area`. Hovered buttons grow by a
    /// column on each side.
    pub fn rect(&self, area: Rect, hovered: bool) -> Rect {
        let padding = self.font_size / 10 + u16::from(hovered);
        let label_width = Line::from(self.label).width() as u16;
        let width = (label_width + 2 * padding).min(area.width);

        let centre_x = area.x + scale(area.width, self.centre.0);
        let centre_y = area.y + scale(area.height, self.centre.1);

        let x = centre_x
            .saturating_sub(width / 2)
            .clamp(area.x, area.right().saturating_sub(width));
        let y = centre_y.min(area.bottom().saturating_sub(1));

        Rect::new(x, y, width, 1.min(area.height))
    }
}

fn scale(length: u16, percent: u16) -> u16 {
    (u32::from(length) * u32::from(percent.min(100)) / 100) as u16
}

pub const TITLE_BUTTONS: [Button; 3] = [
    Button {
        label: "Start",
        centre: (50, 55),
        font_size: 30,
        fg: WHITE,
        bg: BLUE,
        action: Some(Transition::NewGame),
    },
    Button {
        label: "Pal",
        centre: (50, 67),
        font_size: 30,
        fg: WHITE,
        bg: BLUE,
        action: Some(Transition::Pal),
    },
    Button {
        label: "Quit",
        centre: (50, 83),
        font_size: 30,
        fg: WHITE,
        bg: BLUE,
        action: Some(Transition::Quit),
    },
];

/// Icon bar across the top of the pal screen, plus the way back.
pub const PAL_BUTTONS: [Button; 5] = [
    Button {
        label: "Food",
        centre: (12, 10),
        font_size: 20,
        fg: BROWN,
        bg: PINK,
        action: None,
    },
    Button {
        label: "Cart",
        centre: (37, 10),
        font_size: 20,
        fg: BROWN,
        bg: PINK,
        action: None,
    },
    Button {
        label: "Hanger",
        centre: (62, 10),
        font_size: 20,
        fg: BROWN,
        bg: PINK,
        action: None,
    },
    Button {
        label: "Stats",
        centre: (87, 10),
        font_size: 20,
        fg: BROWN,
        bg: PINK,
        action: None,
    },
    Button {
        label: "Return to main menu",
        centre: (17, 95),
        font_size: 20,
        fg: WHITE,
        bg: BLUE,
        action: Some(Transition::Title),
    },
];

pub const GAME_OVER_BUTTONS: [Button; 2] = [
    Button {
        label: "Play again",
        centre: (50, 60),
        font_size: 20,
        fg: WHITE,
        bg: BLUE,
        action: Some(Transition::NewGame),
    },
    Button {
        label: "Return to main menu",
        centre: (50, 75),
        font_size: 20,
        fg: WHITE,
        bg: BLUE,
        action: Some(Transition::Title),
    },
];

/// A list of buttons plus which one the mouse is over.
#[derive(Clone, Debug, PartialEq)]
pub struct Menu {
    buttons: &'static [Button],
    hovered: Option<usize>,
}

impl Menu {
    pub fn new(buttons: &'static [Button]) -> Self {
        Menu {
            buttons,
            hovered: None,
        }
    }

    pub fn hovered(&self) -> Option<&Button> {
        self.hovered.map(|index| &self.buttons[index])
    }

    fn button_at(&self, area: Rect, pos: Position) -> Option<usize> {
        self.buttons
            .iter()
            .enumerate()
            .find(|&(index, button)| {
                button
                    .rect(area, self.hovered == Some(index))
                    .contains(pos)
            })
            .map(|(index, _)| index)
    }

    pub fn pointer_moved(&mut self, area: Rect, pos: Position) {
        self.hovered = self.button_at(area, pos);
    }

    /// Transition of the button under `pos`, if it has one.
    pub fn click(&mut self, area: Rect, pos: Position) -> Option<Transition> {
        self.pointer_moved(area, pos);
        self.hovered().and_then(|button| button.action)
    }
}

impl Widget for &Menu {
    fn render(self, area: Rect, buf: &mut Buffer) {
        for (index, button) in self.buttons.iter().enumerate() {
            let hovered = self.hovered == Some(index);
            let rect = button.rect(area, hovered);
            let mut style = Style::default().fg(button.fg).bg(button.bg);
            if hovered {
                style = style.add_modifier(Modifier::BOLD);
            }
            buf.set_style(rect, style);
            Line::from(button.label)
                .style(style)
                .centered()
                .render(rect, buf);
        }
    }
}
