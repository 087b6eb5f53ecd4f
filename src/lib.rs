//! JATC (workspace facade crate).
//!
//! Re-exports the member crates under one roof: `jatc::{core, input, term, types}`.

pub use jatc_core as core;
pub use jatc_input as input;
pub use jatc_term as term;
pub use jatc_types as types;
