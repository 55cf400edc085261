//! Per-sphere controllers: each one owns the id of its sphere, its pointer
//! state and the handles of the sequences it started.

mod idle;
mod scroll;

pub use idle::IdleSphere;
pub use scroll::{AppearState, ScrollSphere};
