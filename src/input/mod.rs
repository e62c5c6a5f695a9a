//! Input handling module
//!
//! Raw keyboard and pointer state supplied by the host window.

mod state;

pub use state::Input;
