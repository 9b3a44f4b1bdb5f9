//! Headless create/edit tournament form.
//!
//! Holds field values, validates them and turns a valid submission into a
//! [`TournamentDraft`]. Rendering is up to the caller; nothing here touches
//! the store or the network.

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};

use super::models::{DateRange, Organizer, Tournament, TournamentDraft, TournamentStatus, User};

pub const MIN_LENGTH_MESSAGE: &str = "String must contain at least 1 character(s)";
pub const REQUIRED_MESSAGE: &str = "Required";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormMode {
    Create,
    Edit,
}

impl FormMode {
    pub fn heading(&self) -> &'static str {
        match self {
            FormMode::Create => "Create",
            FormMode::Edit => "Edit",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FormField {
    Name,
    DateFrom,
    Organizer,
}

impl fmt::Display for FormField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FormField::Name => write!(f, "name"),
            FormField::DateFrom => write!(f, "date.from"),
            FormField::Organizer => write!(f, "organizer"),
        }
    }
}

/// Inline validation messages, at most one per field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormErrors {
    errors: BTreeMap<FormField, String>,
}

impl FormErrors {
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn get(&self, field: FormField) -> Option<&str> {
        self.errors.get(&field).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (FormField, &str)> {
        self.errors.iter().map(|(field, message)| (*field, message.as_str()))
    }

    fn insert(&mut self, field: FormField, message: &str) {
        self.errors.entry(field).or_insert_with(|| message.to_string());
    }
}

impl fmt::Display for FormErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (field, message) in self.iter() {
            if !first {
                f.write_str("; ")?;
            }
            write!(f, "{}: {}", field, message)?;
            first = false;
        }
        Ok(())
    }
}

impl std::error::Error for FormErrors {}

/// Current field values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TournamentFormValues {
    pub name: String,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    pub organizer: String,
    pub description: String,
}

pub struct EditTournamentForm {
    base: Option<Tournament>,
    organizer_id: String,
    values: TournamentFormValues,
}

impl EditTournamentForm {
    /// Form pre-filled from `base` (edit) or empty with `today` as the
    /// start date (create).
    pub fn new(base: Option<&Tournament>, user: &User, today: NaiveDate) -> Self {
        let values = match base {
            Some(t) => TournamentFormValues {
                name: t.name.clone(),
                from: Some(calendar_date(t.date.from).unwrap_or(today)),
                to: t.date.to.and_then(calendar_date),
                organizer: t.organizer.name.clone(),
                description: t.description.clone().unwrap_or_default(),
            },
            None => TournamentFormValues {
                name: String::new(),
                from: Some(today),
                to: None,
                organizer: String::new(),
                description: String::new(),
            },
        };

        Self {
            base: base.cloned(),
            organizer_id: user.email.clone(),
            values,
        }
    }

    pub fn mode(&self) -> FormMode {
        match &self.base {
            Some(t) if !t.id.is_empty() => FormMode::Edit,
            _ => FormMode::Create,
        }
    }

    pub fn heading(&self) -> &'static str {
        self.mode().heading()
    }

    pub fn base(&self) -> Option<&Tournament> {
        self.base.as_ref()
    }

    pub fn values(&self) -> &TournamentFormValues {
        &self.values
    }

    pub fn values_mut(&mut self) -> &mut TournamentFormValues {
        &mut self.values
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.values.name = name.into();
    }

    pub fn set_dates(&mut self, from: Option<NaiveDate>, to: Option<NaiveDate>) {
        self.values.from = from;
        self.values.to = to;
    }

    pub fn set_organizer(&mut self, organizer: impl Into<String>) {
        self.values.organizer = organizer.into();
    }

    pub fn set_description(&mut self, description: impl Into<String>) {
        self.values.description = description.into();
    }

    pub fn validate(&self) -> FormErrors {
        let mut errors = FormErrors::default();

        if self.values.name.is_empty() {
            errors.insert(FormField::Name, MIN_LENGTH_MESSAGE);
        }
        if self.values.from.is_none() {
            errors.insert(FormField::DateFrom, REQUIRED_MESSAGE);
        }
        if self.values.organizer.is_empty() {
            errors.insert(FormField::Organizer, MIN_LENGTH_MESSAGE);
        }

        errors
    }

    /// Draft the current values would submit.
    ///
    /// Starts from the base record so fields the form does not edit
    /// (id, status, unknown extras) are carried through.
    pub fn draft(&self) -> Result<TournamentDraft, FormErrors> {
        let errors = self.validate();
        let from = match self.values.from {
            Some(from) if errors.is_empty() => from,
            _ => return Err(errors),
        };

        let mut draft = self
            .base
            .clone()
            .map(TournamentDraft::from)
            .unwrap_or_default();

        let base_date = self.base.as_ref().map(|t| t.date);
        draft.name = Some(self.values.name.clone());
        draft.date = Some(DateRange {
            from: instant_for(from, base_date.map(|d| d.from)),
            to: self
                .values
                .to
                .map(|to| instant_for(to, base_date.and_then(|d| d.to))),
        });
        draft.organizer = Some(Organizer {
            id: self.organizer_id.clone(),
            name: self.values.organizer.clone(),
        });
        draft.description =
            (!self.values.description.is_empty()).then(|| self.values.description.clone());
        draft.status = Some(draft.status.unwrap_or(TournamentStatus::SetUp));

        Ok(draft)
    }

    /// Validate and hand the draft to `on_confirm`.
    ///
    /// On validation failure the callback is not invoked and the errors
    /// are returned for inline display.
    pub fn submit<F>(&self, on_confirm: F) -> Result<(), FormErrors>
    where
        F: FnOnce(TournamentDraft),
    {
        let draft = self.draft()?;
        on_confirm(draft);
        Ok(())
    }

    pub fn close<F: FnOnce()>(&self, on_close: F) {
        on_close();
    }
}

/// Calendar date (UTC) of an instant in milliseconds.
pub fn calendar_date(millis: i64) -> Option<NaiveDate> {
    DateTime::<Utc>::from_timestamp_millis(millis).map(|instant| instant.date_naive())
}

/// Instant to submit for a picked calendar date: the base instant when
/// the date is unchanged, otherwise UTC midnight.
fn instant_for(date: NaiveDate, base: Option<i64>) -> i64 {
    match base {
        Some(millis) if calendar_date(millis) == Some(date) => millis,
        _ => start_of_day_millis(date),
    }
}

/// Milliseconds since the epoch at UTC midnight of `date`.
pub fn start_of_day_millis(date: NaiveDate) -> i64 {
    date.and_time(NaiveTime::MIN).and_utc().timestamp_millis()
}
