//! Application model types: `App` and `InputMode`.
//!
//! The `App` struct holds what only the terminal needs: which row is
//! selected, whether the search prompt is open, and where the progress gauge
//! was last drawn.

use ratatui::layout::Rect;

/// Where key presses go.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum InputMode {
    #[default]
    Normal,
    /// Typing into the search prompt.
    Search,
}

/// The terminal-side application model.
#[derive(Debug, Default)]
pub struct App {
    pub selected: usize,
    pub mode: InputMode,
    pub search_input: String,
    /// Last query submitted from the prompt or the command line.
    pub last_query: Option<String>,

    /// Track list version the selection belongs to.
    seen_tracks_version: u64,
    /// Inner area of the progress gauge from the last draw.
    progress_area: Option<Rect>,
}

impl App {
    pub fn new() -> Self {
        Self::default()
    }

    /// Keep the selection valid for a list of `len` tracks. A new list
    /// (different `version`) moves the cursor back to the top.
    pub fn sync_tracks(&mut self, version: u64, len: usize) {
        if version != self.seen_tracks_version {
            self.seen_tracks_version = version;
            self.selected = 0;
        } else if len == 0 {
            self.selected = 0;
        } else if self.selected >= len {
            self.selected = len - 1;
        }
    }

    /// Move selection to the next row, wrapping to the top.
    pub fn next(&mut self, len: usize) {
        if len > 0 {
            self.selected = (self.selected + 1) % len;
        }
    }

    /// Move selection to the previous row, wrapping to the bottom.
    pub fn prev(&mut self, len: usize) {
        if len > 0 {
            self.selected = (self.selected % len + len - 1) % len;
        }
    }

    /// Open the search prompt, pre-filled with the last query.
    pub fn enter_search_mode(&mut self) {
        self.mode = InputMode::Search;
        self.search_input = self.last_query.clone().unwrap_or_default();
    }

    pub fn cancel_search(&mut self) {
        self.mode = InputMode::Normal;
        self.search_input.clear();
    }

    pub fn push_search_char(&mut self, c: char) {
        self.search_input.push(c);
    }

    pub fn pop_search_char(&mut self) {
        self.search_input.pop();
    }

    /// Close the prompt and hand back the query to run, if it is not blank.
    pub fn submit_search(&mut self) -> Option<String> {
        self.mode = InputMode::Normal;
        let query = std::mem::take(&mut self.search_input);
        let query = query.trim();
        if query.is_empty() {
            return None;
        }
        self.last_query = Some(query.to_string());
        Some(query.to_string())
    }

    pub fn set_progress_area(&mut self, area: Rect) {
        self.progress_area = Some(area);
    }

    /// Fraction of the progress gauge under the cell at (`column`, `row`),
    /// or `None` when the click landed elsewhere.
    pub fn seek_fraction_at(&self, column: u16, row: u16) -> Option<f64> {
        let area = self.progress_area?;
        if area.width == 0
            || column < area.x
            || column >= area.x + area.width
            || row < area.y
            || row >= area.y + area.height
        {
            return None;
        }
        if area.width == 1 {
            return Some(0.0);
        }
        Some(f64::from(column - area.x) / f64::from(area.width - 1))
    }
}

/// Seek fraction bound to a digit key: `'3'` jumps to 30 %.
pub fn digit_seek_fraction(c: char) -> Option<f64> {
    c.to_digit(10).map(|d| f64::from(d) / 10.0)
}
