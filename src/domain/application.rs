//! Application domain model and operations.
//!
//! This module defines the `Application` type, the single record the client tracks:
//! one job application with its company, position, status, notes, and the date it
//! was sent. Records travel to and from the remote store as camelCase JSON.

use super::error::{Result, TrackerError};
use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

/// Format of the date-only part of `appliedDate`.
const DATE_FORMAT: &str = "%Y-%m-%d";

/// Progress of an application through the hiring pipeline.
///
/// Serialized with the variant name (`"Applied"`, `"Interviewing"`, ...). The
/// shorter `"Interview"` spelling, which older records may carry, is accepted on
/// input and normalized to [`ApplicationStatus::Interviewing`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ApplicationStatus {
    #[default]
    Applied,
    #[serde(alias = "Interview")]
    Interviewing,
    Offer,
    Rejected,
}

impl ApplicationStatus {
    /// Every status, in pipeline order.
    pub const ALL: [Self; 4] = [Self::Applied, Self::Interviewing, Self::Offer, Self::Rejected];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Applied => "Applied",
            Self::Interviewing => "Interviewing",
            Self::Offer => "Offer",
            Self::Rejected => "Rejected",
        }
    }
}

impl fmt::Display for ApplicationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ApplicationStatus {
    type Err = TrackerError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "applied" => Ok(Self::Applied),
            "interviewing" | "interview" => Ok(Self::Interviewing),
            "offer" => Ok(Self::Offer),
            "rejected" => Ok(Self::Rejected),
            _ => Err(TrackerError::precondition(format!("unknown status: {s}"))),
        }
    }
}

/// Status selector for the filtered view.
///
/// [`StatusFilter::All`] is the sentinel that matches every record; any other
/// value matches only records with exactly that status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusFilter {
    #[default]
    All,
    Only(ApplicationStatus),
}

impl StatusFilter {
    /// Returns `true` if a record with `status` passes this selector.
    #[must_use]
    pub fn matches(self, status: ApplicationStatus) -> bool {
        match self {
            Self::All => true,
            Self::Only(wanted) => wanted == status,
        }
    }
}

impl From<ApplicationStatus> for StatusFilter {
    fn from(status: ApplicationStatus) -> Self {
        Self::Only(status)
    }
}

impl fmt::Display for StatusFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => f.write_str("All"),
            Self::Only(status) => status.fmt(f),
        }
    }
}

impl FromStr for StatusFilter {
    type Err = TrackerError;

    fn from_str(s: &str) -> Result<Self> {
        if s.trim().eq_ignore_ascii_case("all") {
            Ok(Self::All)
        } else {
            s.parse().map(Self::Only)
        }
    }
}

/// Editable fields of an [`Application`], named as the form inputs name them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Company,
    Position,
    AppliedDate,
    Status,
    Notes,
}

impl Field {
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Company => "company",
            Self::Position => "position",
            Self::AppliedDate => "appliedDate",
            Self::Status => "status",
            Self::Notes => "notes",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Field {
    type Err = TrackerError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "company" => Ok(Self::Company),
            "position" => Ok(Self::Position),
            "appliedDate" | "applied_date" | "applied-date" => Ok(Self::AppliedDate),
            "status" => Ok(Self::Status),
            "notes" => Ok(Self::Notes),
            _ => Err(TrackerError::precondition(format!("unknown field: {s}"))),
        }
    }
}

/// A tracked job application.
///
/// # Fields
///
/// - `id`: Remote identity, `None` until the remote store acknowledges the record
/// - `company`, `position`: Display strings, required
/// - `applied_date`: ISO-8601 date as transmitted; may carry a time component
/// - `status`: Pipeline stage
/// - `notes`: Free text, may be empty
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Application {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub company: String,
    pub position: String,
    pub applied_date: String,
    #[serde(default)]
    pub status: ApplicationStatus,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub notes: String,
}

impl Application {
    /// Creates an unsaved draft with status `Applied` and empty notes.
    ///
    /// # Examples
    ///
    /// ```
    /// use applytrack::{Application, ApplicationStatus};
    ///
    /// let draft = Application::new("Acme", "Engineer", "2024-01-05");
    /// assert!(draft.id.is_none());
    /// assert_eq!(draft.status, ApplicationStatus::Applied);
    /// ```
    #[must_use]
    pub fn new(
        company: impl Into<String>,
        position: impl Into<String>,
        applied_date: impl Into<String>,
    ) -> Self {
        Self {
            id: None,
            company: company.into(),
            position: position.into(),
            applied_date: applied_date.into(),
            status: ApplicationStatus::Applied,
            notes: String::new(),
        }
    }

    #[must_use]
    pub fn with_status(mut self, status: ApplicationStatus) -> Self {
        self.status = status;
        self
    }

    #[must_use]
    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = notes.into();
        self
    }

    #[must_use]
    pub const fn with_id(mut self, id: i64) -> Self {
        self.id = Some(id);
        self
    }

    /// Returns `true` once the remote store has assigned an id.
    #[must_use]
    pub const fn is_persisted(&self) -> bool {
        self.id.is_some()
    }

    /// Parses the date part of `applied_date`, ignoring any time component.
    #[must_use]
    pub fn applied_on(&self) -> Option<NaiveDate> {
        NaiveDate::parse_from_str(date_only(&self.applied_date), DATE_FORMAT).ok()
    }

    /// Checks that the required fields are present (non-blank).
    ///
    /// # Errors
    ///
    /// Returns [`TrackerError::Precondition`] naming the first missing field.
    pub fn validate_presence(&self) -> Result<()> {
        let required = [
            (Field::Company, &self.company),
            (Field::Position, &self.position),
            (Field::AppliedDate, &self.applied_date),
        ];
        match required.iter().find(|(_, value)| value.trim().is_empty()) {
            Some((field, _)) => Err(TrackerError::precondition(format!("{field} is required"))),
            None => Ok(()),
        }
    }

    /// Sets a single field from its form value.
    ///
    /// # Errors
    ///
    /// Returns [`TrackerError::Precondition`] if `field` is `Status` and `value`
    /// is not a known status. The record is left unchanged in that case.
    pub fn set_field(&mut self, field: Field, value: &str) -> Result<()> {
        match field {
            Field::Company => self.company = value.to_string(),
            Field::Position => self.position = value.to_string(),
            Field::AppliedDate => self.applied_date = value.to_string(),
            Field::Status => self.status = value.parse()?,
            Field::Notes => self.notes = value.to_string(),
        }
        Ok(())
    }
}

/// Strips a time component from an ISO-8601 timestamp.
///
/// # Examples
///
/// ```
/// use applytrack::domain::date_only;
///
/// assert_eq!(date_only("2024-01-05T00:00:00Z"), "2024-01-05");
/// assert_eq!(date_only("2024-01-05"), "2024-01-05");
/// ```
#[must_use]
pub fn date_only(raw: &str) -> &str {
    raw.split_once('T').map_or(raw, |(date, _)| date)
}

fn null_as_empty<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}
