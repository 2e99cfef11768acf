//! Board and scene state machine.

pub mod event;
pub mod grid;
pub mod scene;
