//! Presentation layer: view models and their plain-text rendering.
//!
//! ```text
//! canonical list + DashboardState → compute_viewmodel → DashboardViewModel → render
//! ```
//!
//! # Modules
//!
//! - [`viewmodel`]: display-ready types computed from state
//! - [`renderer`]: plain-text output for the command line

pub mod renderer;
pub mod viewmodel;

pub use renderer::{render, render_to_string};
pub use viewmodel::{
    DashboardViewModel, DisplayItem, EmptyState, SearchBarInfo, StatusSummary, EMPTY_MESSAGE,
};
