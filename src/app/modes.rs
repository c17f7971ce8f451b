//! Edit session state machine.
//!
//! ```text
//!            begin(record)
//!   Idle ───────────────────▶ Editing ◀──────────┐
//!    ▲                          │  ▲             │ submit failed
//!    │ cancel / submit ok       │  │ begin(other)│
//!    │                          ▼  │             │
//!    └────────────────────── Committing ─────────┘
//! ```
//!
//! `Editing` holds the record as it was selected (`snapshot`) and the working
//! copy the user changes (`draft`). `Committing` is the same pair while the
//! update is in flight.

use crate::domain::Application;

/// State of an edit session.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum EditState {
    /// No record selected.
    #[default]
    Idle,

    /// A record is selected and its draft may be changed.
    Editing {
        snapshot: Application,
        draft: Application,
    },

    /// The draft has been submitted and the update is outstanding.
    Committing {
        snapshot: Application,
        draft: Application,
    },
}

impl EditState {
    #[must_use]
    pub const fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }

    #[must_use]
    pub const fn is_editing(&self) -> bool {
        matches!(self, Self::Editing { .. })
    }

    #[must_use]
    pub const fn is_committing(&self) -> bool {
        matches!(self, Self::Committing { .. })
    }

    #[must_use]
    pub const fn draft(&self) -> Option<&Application> {
        match self {
            Self::Idle => None,
            Self::Editing { draft, .. } | Self::Committing { draft, .. } => Some(draft),
        }
    }

    #[must_use]
    pub const fn snapshot(&self) -> Option<&Application> {
        match self {
            Self::Idle => None,
            Self::Editing { snapshot, .. } | Self::Committing { snapshot, .. } => Some(snapshot),
        }
    }

    /// Short label for logs.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Editing { .. } => "editing",
            Self::Committing { .. } => "committing",
        }
    }
}
