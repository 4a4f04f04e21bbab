use crate::controller::report::{NetworkSnapshot, PathInfo};
use crossterm::event::KeyCode;

pub struct App {
    pub snapshot: NetworkSnapshot,
    pub running: bool,
    selected: usize,
}

impl App {
    pub fn new(snapshot: NetworkSnapshot) -> Self {
        Self {
            snapshot,
            running: true,
            selected: 0,
        }
    }

    pub fn selected(&self) -> usize {
        self.selected
    }

    pub fn selected_path(&self) -> Option<&PathInfo> {
        self.snapshot.paths.get(self.selected)
    }

    pub fn handle_key(&mut self, code: KeyCode) {
        let count = self.snapshot.paths.len();
        match code {
            KeyCode::Char('q') | KeyCode::Esc => self.running = false,
            KeyCode::Down | KeyCode::Char('j') if count > 0 => {
                self.selected = (self.selected + 1) % count;
            }
            KeyCode::Up | KeyCode::Char('k') if count > 0 => {
                self.selected = (self.selected + count - 1) % count;
            }
            _ => {}
        }
    }
}

impl Drop for App {
    fn drop(&mut self) {
        ratatui::restore();
    }
}
