//! Application layer: the canonical list, its derived view, and edit flows.
//!
//! This layer sits between the gateway and whatever presents the data (the
//! CLI in `main.rs`). Reads flow one way and writes round-trip:
//!
//! ```text
//! gateway ──▶ ApplicationStore ──▶ filter (DashboardState) ──▶ view model
//!    ▲                │
//!    └── EditCoordinator / NewApplicationForm ◀── user input
//! ```
//!
//! # Modules
//!
//! - [`store`]: canonical list, pessimistic mutations, request versioning
//! - [`editor`]: single-record edit session
//! - [`modes`]: edit session state machine
//! - [`form`]: new-application draft
//! - [`filter`]: search and status filtering
//! - [`debounce`]: quiet-period value stabilizer
//! - [`state`]: dashboard filter state and view model computation

pub mod debounce;
pub mod editor;
pub mod filter;
pub mod form;
pub mod modes;
pub mod state;
pub mod store;

pub use debounce::{spawn_debouncer, DebounceHandle, DebouncedQuery, DEFAULT_QUIET_PERIOD};
pub use editor::EditCoordinator;
pub use filter::{filter_applications, matches_query, matches_status};
pub use form::NewApplicationForm;
pub use modes::EditState;
pub use state::DashboardState;
pub use store::{ApplicationStore, ConfirmPrompt, Removal, DELETE_CONFIRMATION};
