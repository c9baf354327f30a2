//! Game rules for Connect Four.
//!
//! Pure functions over a [`Board`](crate::Board). Rules are kept apart from
//! board storage so the engine, the bot and the renderers share one source of
//! truth.

pub mod draw;
pub mod gravity;
pub mod win;

pub use draw::{is_draw, is_full};
pub use gravity::is_settled;
pub use win::{Direction, WinningLine, has_four, winning_line, wins_after_drop};
