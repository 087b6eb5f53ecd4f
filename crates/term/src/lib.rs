//! Terminal game renderer.
//!
//! A small, game-oriented rendering layer: the view draws a snapshot into a
//! framebuffer of styled characters and the renderer flushes only the cells
//! that changed since the previous frame.
//!
//! Goals:
//! - Keep `core` free of terminal concerns
//! - Precise control over aspect ratio (2 chars wide per cell by default)

pub mod fb;
pub mod game_view;
pub mod renderer;

pub use jatc_core as core;
pub use jatc_types as types;

pub use fb::{Cell, CellStyle, FrameBuffer, Rgb};
pub use game_view::{clock_text, event_label, AnchorY, GameView, Viewport};
pub use renderer::{encode_diff_into, encode_full_into, TerminalRenderer};
