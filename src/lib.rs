//! 2048 board engine (workspace facade crate).
//!
//! Re-exports the member crates as `twenty48::{types, core, adapter}` so
//! callers depend on one package while the implementation lives under
//! `crates/`.

pub use twenty48_adapter as adapter;
pub use twenty48_core as core;
pub use twenty48_types as types;
