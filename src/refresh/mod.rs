//! Refresh control
//!
//! - **controller**: runs the pipeline and publishes versioned view states
//! - **debounce**: collapses bursts of change notifications into one run
//! - **cancel**: cancellation tokens for pending runs

mod cancel;
mod controller;
mod debounce;

pub use cancel::CancellationToken;
pub use controller::{AutoRefresh, RefreshController, RefreshOutcome, ViewState};
pub use debounce::Debouncer;
