//! Match-3 (workspace facade crate).
//!
//! Re-exports the engine crates under `match3::{core, types}` so callers and
//! integration tests depend on one package.

pub use match3_core as core;
pub use match3_types as types;
