//! Trixel (workspace facade crate).
//!
//! Re-exports the member crates under short paths so the host binary, integration tests and
//! benches can use `trixel::{core,input,store,term,types}`.

pub use trixel_core as core;
pub use trixel_input as input;
pub use trixel_store as store;
pub use trixel_term as term;
pub use trixel_types as types;
