//! View state and the controller that keeps it in sync with the catalog.
//!
//! - [`state`]: the [`ViewState`] record
//! - [`reducer`]: pure transitions for every user intent and effect result
//! - [`controller`]: the task that owns the state and runs effects

pub mod controller;
pub mod reducer;
pub mod state;

pub use controller::{create_view_system, ViewController, ViewError, ViewHandle};
pub use reducer::{Completion, Effect, FetchTicket, Transition, ViewEvent};
pub use state::{FetchStatus, ViewState};
