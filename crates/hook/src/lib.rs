//! Event hooks: the observer primitive every other cadence crate uses for
//! decoupled notification.
//!
//! # Invariants
//! - `fire` is synchronous and visits connections in connection order.
//! - A connection removed during a `fire` pass is not invoked later in that pass;
//!   a connection added during a pass first runs on the next `fire`.
//! - A panicking callback is reported and never stops its siblings.

mod hook;

pub use hook::{Connection, FireReport, Hook};

pub fn crate_info() -> &'static str {
    "cadence-hook v0.1.0"
}
