//! Navigation state kept entirely in the location.
//!
//! The current location is the only store of UI state: [`NavState`] is a pure
//! function of it, and every state change goes through [`Navigator`] as a new
//! navigation, so history and deep links just work.

mod location;
mod navigator;
mod state;

pub use location::{Location, LocationError};
pub use navigator::{MemoryRouter, Navigator, Router};
pub use state::{NavState, View};
