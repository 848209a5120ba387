//! Crossterm front end: draws the grid and the clip clock.
//!
//! Full redraw every frame; the grid is tiny.

use std::io::{self, Stdout, Write};

use anyhow::Result;
use crossterm::{
    cursor,
    style::{Attribute, Color, Print, ResetColor, SetAttribute, SetForegroundColor},
    terminal, QueueableCommand,
};

use slide_puzzle::{GameSession, SessionState, TileId};

const CELL_WIDTH: u16 = 6;
const CELL_HEIGHT: u16 = 3;
const ORIGIN_X: u16 = 2;
const ORIGIN_Y: u16 = 4;
const BAR_WIDTH: usize = 30;

pub struct Screen {
    stdout: Stdout,
    show_labels: bool,
}

/// What the status area shows besides the grid.
pub struct Hud<'a> {
    pub clip_position: f64,
    pub clip_duration: f64,
    pub message: &'a str,
}

impl Screen {
    pub fn new(show_labels: bool) -> Self {
        Self {
            stdout: io::stdout(),
            show_labels,
        }
    }

    pub fn enter(&mut self) -> Result<()> {
        terminal::enable_raw_mode()?;
        self.stdout.queue(terminal::EnterAlternateScreen)?;
        self.stdout.queue(cursor::Hide)?;
        self.stdout.flush()?;
        Ok(())
    }

    pub fn exit(&mut self) -> Result<()> {
        self.stdout.queue(ResetColor)?;
        self.stdout.queue(SetAttribute(Attribute::Reset))?;
        self.stdout.queue(cursor::Show)?;
        self.stdout.queue(terminal::LeaveAlternateScreen)?;
        self.stdout.flush()?;
        terminal::disable_raw_mode()?;
        Ok(())
    }

    pub fn draw(&mut self, session: &GameSession, hud: &Hud<'_>) -> Result<()> {
        let puzzle = session.puzzle();
        let width = puzzle.config().width;
        let empty = puzzle.empty_tile().id();

        self.stdout.queue(terminal::Clear(terminal::ClearType::All))?;
        self.stdout.queue(cursor::MoveTo(ORIGIN_X, 0))?;
        self.stdout.queue(SetAttribute(Attribute::Bold))?;
        self.stdout.queue(Print(format!(
            "{}  moves: {}  misplaced: {}",
            state_label(session.state()),
            session.moves_made(),
            puzzle.misplaced_tiles()
        )))?;
        self.stdout.queue(SetAttribute(Attribute::Reset))?;

        self.stdout.queue(cursor::MoveTo(ORIGIN_X, 1))?;
        self.stdout.queue(Print(progress_bar(hud.clip_position, hud.clip_duration)))?;
        self.stdout.queue(cursor::MoveTo(ORIGIN_X, 2))?;
        self.stdout.queue(Print(hud.message))?;

        for (index, slot) in puzzle.tile_render_order().into_iter().enumerate() {
            let id = TileId(index);
            let col = (slot % width) as u16;
            let row = (slot / width) as u16;
            let x = ORIGIN_X + col * CELL_WIDTH;
            let y = ORIGIN_Y + row * CELL_HEIGHT;

            let color = if id == empty {
                Color::DarkGrey
            } else if session.state() == SessionState::Running && puzzle.is_adjacent(id, empty) {
                Color::Yellow
            } else if puzzle.tile(id).is_some_and(|tile| tile.is_home()) {
                Color::Green
            } else {
                Color::White
            };
            self.draw_cell(x, y, id, id == empty, color)?;
        }

        let footer = ORIGIN_Y + CELL_HEIGHT * puzzle.config().height as u16 + 1;
        self.stdout.queue(ResetColor)?;
        self.stdout.queue(cursor::MoveTo(ORIGIN_X, footer))?;
        self.stdout.queue(Print(
            "arrows: slide  s: start  g: give up  n: new game  q: quit",
        ))?;
        self.stdout.flush()?;
        Ok(())
    }

    fn draw_cell(&mut self, x: u16, y: u16, id: TileId, is_empty: bool, color: Color) -> Result<()> {
        let label = if is_empty {
            format!("{:^4}", "·")
        } else if self.show_labels {
            format!("{:^4}", id.index())
        } else {
            "    ".to_string()
        };

        self.stdout.queue(SetForegroundColor(color))?;
        self.stdout.queue(cursor::MoveTo(x, y))?;
        self.stdout.queue(Print("┌────┐"))?;
        self.stdout.queue(cursor::MoveTo(x, y + 1))?;
        self.stdout.queue(Print(format!("│{label}│")))?;
        self.stdout.queue(cursor::MoveTo(x, y + 2))?;
        self.stdout.queue(Print("└────┘"))?;
        Ok(())
    }
}

fn state_label(state: SessionState) -> &'static str {
    match state {
        SessionState::Idle => "READY",
        SessionState::Running => "PLAYING",
        SessionState::Won => "SOLVED",
        SessionState::Lost => "LOST",
    }
}

fn progress_bar(position: f64, duration: f64) -> String {
    let fraction = if duration > 0.0 {
        (position / duration).clamp(0.0, 1.0)
    } else {
        0.0
    };
    let filled = (fraction * BAR_WIDTH as f64).round() as usize;
    format!(
        "[{}{}] {:5.1}s / {:.1}s",
        "#".repeat(filled),
        "-".repeat(BAR_WIDTH - filled),
        position,
        duration
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_progress_bar_bounds() {
        assert!(progress_bar(0.0, 60.0).starts_with(&format!("[{}]", "-".repeat(BAR_WIDTH))));
        assert!(progress_bar(90.0, 60.0).starts_with(&format!("[{}]", "#".repeat(BAR_WIDTH))));
        assert!(progress_bar(5.0, 0.0).starts_with(&format!("[{}]", "-".repeat(BAR_WIDTH))));
    }
}
