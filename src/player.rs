//! The player core: session state, the controller that owns it, catalog
//! fetch workers and the view projection.

mod controller;
mod fetch;
mod session;
mod view;

pub use controller::PlayerController;
pub use session::{PlaybackSession, PlayerState, Progress};
pub use view::{NowPlayingView, sanitize_text, track_row};
