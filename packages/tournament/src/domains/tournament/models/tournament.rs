use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::common::TournamentError;

/// Tournament lifecycle status
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum TournamentStatus {
    #[default]
    SetUp,
    Ongoing,
    Finished,
    Cancelled,
}

impl std::fmt::Display for TournamentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TournamentStatus::SetUp => write!(f, "set-up"),
            TournamentStatus::Ongoing => write!(f, "ongoing"),
            TournamentStatus::Finished => write!(f, "finished"),
            TournamentStatus::Cancelled => write!(f, "cancelled"),
        }
    }
}

impl std::str::FromStr for TournamentStatus {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        match s {
            "set-up" => Ok(TournamentStatus::SetUp),
            "ongoing" => Ok(TournamentStatus::Ongoing),
            "finished" => Ok(TournamentStatus::Finished),
            "cancelled" => Ok(TournamentStatus::Cancelled),
            _ => Err(anyhow::anyhow!("Invalid tournament status: {}", s)),
        }
    }
}

/// Start/end instants in milliseconds since the Unix epoch.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct DateRange {
    pub from: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to: Option<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Organizer {
    pub id: String,
    pub name: String,
}

/// Tournament record as the backend stores it.
///
/// Fields the client does not model are kept in `extra` so an edit sends
/// them back untouched.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Tournament {
    pub id: String,
    pub name: String,
    pub date: DateRange,
    pub organizer: Organizer,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub status: TournamentStatus,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Partial tournament, as submitted by the edit form.
///
/// Absent fields are omitted on the wire; the backend assigns `id` on
/// create.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TournamentDraft {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<DateRange>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub organizer: Option<Organizer>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<TournamentStatus>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl From<Tournament> for TournamentDraft {
    fn from(t: Tournament) -> Self {
        Self {
            id: Some(t.id),
            name: Some(t.name),
            date: Some(t.date),
            organizer: Some(t.organizer),
            description: t.description,
            status: Some(t.status),
            extra: t.extra,
        }
    }
}

impl TryFrom<TournamentDraft> for Tournament {
    type Error = TournamentError;

    fn try_from(draft: TournamentDraft) -> Result<Self, Self::Error> {
        fn required<T>(value: Option<T>, field: &'static str) -> Result<T, TournamentError> {
            value.ok_or(TournamentError::IncompleteDraft { field })
        }

        Ok(Self {
            id: required(draft.id, "id")?,
            name: required(draft.name, "name")?,
            date: required(draft.date, "date")?,
            organizer: required(draft.organizer, "organizer")?,
            description: draft.description,
            status: draft.status.unwrap_or_default(),
            extra: draft.extra,
        })
    }
}

/// The signed-in user submitting forms.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub email: String,
}

impl User {
    pub fn new(email: impl Into<String>) -> Self {
        Self {
            email: email.into(),
        }
    }
}
