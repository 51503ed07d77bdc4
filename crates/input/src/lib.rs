//! Input: host-fed keyboard and mouse state mapped onto key groups.
//!
//! # Invariants
//! - A key is reported down from its press until its release, whatever the shift state.
//! - `down`/`up` hooks fire on transitions only; auto-repeat presses are ignored.
//! - Input hooks share state with their service, so a clone observes later presses.

mod keycode;
mod service;

pub use keycode::KeyCode;
pub use service::{InputHook, InputService};

pub fn crate_info() -> &'static str {
    "cadence-input v0.1.0"
}
