//! Domain layer for the applytrack client.
//!
//! This module contains the core domain types, independent of the HTTP transport,
//! the token store, or any rendering layer.
//!
//! # Organization
//!
//! - [`error`]: Error types and result aliases
//! - [`application`]: Application record, status, and field model
//!
//! # Examples
//!
//! ```
//! use applytrack::domain::{Application, Result};
//!
//! fn draft() -> Result<Application> {
//!     let app = Application::new("Acme", "Engineer", "2024-01-05");
//!     app.validate_presence()?;
//!     Ok(app)
//! }
//! # draft().unwrap();
//! ```

pub mod application;
pub mod error;

pub use application::{date_only, Application, ApplicationStatus, Field, StatusFilter};
pub use error::{Result, TrackerError};
