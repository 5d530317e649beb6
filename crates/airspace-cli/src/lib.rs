//! Airspace CLI - one-shot proximity check against the live feeds.
//!
//! Binaries:
//! - airspace-check: fetch both feeds once, print alerts as JSON

pub mod check;

pub use check::{run_check, CheckReport};
