//! Application module: exposes the UI-side model used by the TUI and runtime.
//!
//! The `App` model lives in `app::model` and holds the list selection, the
//! search prompt and screen geometry needed for mouse seeking. Playback state
//! lives in the `PlayerController`.

mod model;

pub use model::*;

#[cfg(test)]
mod tests;
