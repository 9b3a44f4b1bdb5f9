use std::cell::RefCell;

use chrono::NaiveDate;
use serde_json::{json, Map};
use tournament_core::domains::tournament::{
    DateRange, EditTournamentForm, FormField, FormMode, Organizer, Tournament, TournamentDraft,
    TournamentStatus, User,
};
use tournament_core::domains::tournament::form::{MIN_LENGTH_MESSAGE, REQUIRED_MESSAGE};

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 3, 1).unwrap()
}

fn user() -> User {
    User::new("host@example.com")
}

fn existing() -> Tournament {
    let mut extra = Map::new();
    extra.insert("createdAt".to_string(), json!(1_700_000_000_000i64));

    Tournament {
        id: "t1".to_string(),
        name: "Spring Cup".to_string(),
        date: DateRange {
            // 2024-04-10T15:00:00Z, 2024-04-12T00:00:00Z
            from: 1_712_761_200_000,
            to: Some(1_712_880_000_000),
        },
        organizer: Organizer {
            id: "someone-else@example.com".to_string(),
            name: "Chess Club".to_string(),
        },
        description: Some("Open swiss".to_string()),
        status: TournamentStatus::Ongoing,
        extra,
    }
}

fn submit(form: &EditTournamentForm) -> Option<TournamentDraft> {
    let submitted = RefCell::new(None);
    let _ = form.submit(|draft| *submitted.borrow_mut() = Some(draft));
    submitted.into_inner()
}

#[test]
fn create_form_starts_empty_with_today() {
    let form = EditTournamentForm::new(None, &user(), today());

    assert_eq!(form.mode(), FormMode::Create);
    assert_eq!(form.heading(), "Create");
    assert_eq!(form.values().name, "");
    assert_eq!(form.values().from, Some(today()));
    assert_eq!(form.values().to, None);
}

#[test]
fn edit_form_is_prefilled_from_base() {
    let base = existing();
    let form = EditTournamentForm::new(Some(&base), &user(), today());

    assert_eq!(form.mode(), FormMode::Edit);
    assert_eq!(form.heading(), "Edit");
    assert_eq!(form.values().name, "Spring Cup");
    assert_eq!(form.values().from, NaiveDate::from_ymd_opt(2024, 4, 10));
    assert_eq!(form.values().to, NaiveDate::from_ymd_opt(2024, 4, 12));
    assert_eq!(form.values().organizer, "Chess Club");
    assert_eq!(form.values().description, "Open swiss");
}

#[test]
fn submit_produces_numeric_instants() {
    let mut form = EditTournamentForm::new(None, &user(), today());
    form.set_name("Cup A");
    form.set_organizer("Chess Club");
    form.set_dates(Some(today()), NaiveDate::from_ymd_opt(2024, 3, 3));

    let draft = submit(&form).expect("valid form submits");

    assert_eq!(
        draft.date,
        Some(DateRange {
            from: 1_709_251_200_000,
            to: Some(1_709_424_000_000),
        })
    );

    let wire = serde_json::to_value(&draft).unwrap();
    assert!(wire["date"]["from"].is_i64());
    assert!(wire["date"]["to"].is_i64());
}

#[test]
fn submit_fills_organizer_and_defaults() {
    let mut form = EditTournamentForm::new(None, &user(), today());
    form.set_name("Cup A");
    form.set_organizer("Chess Club");

    let draft = submit(&form).unwrap();

    assert_eq!(draft.id, None);
    assert_eq!(
        draft.organizer,
        Some(Organizer {
            id: "host@example.com".to_string(),
            name: "Chess Club".to_string(),
        })
    );
    assert_eq!(draft.description, None);
    assert_eq!(draft.status, Some(TournamentStatus::SetUp));
}

#[test]
fn edit_submit_keeps_base_fields() {
    let base = existing();
    let mut form = EditTournamentForm::new(Some(&base), &user(), today());
    form.set_name("Renamed Cup");

    let draft = submit(&form).unwrap();

    assert_eq!(draft.id.as_deref(), Some("t1"));
    assert_eq!(draft.status, Some(TournamentStatus::Ongoing));
    assert_eq!(draft.extra.get("createdAt"), Some(&json!(1_700_000_000_000i64)));
    assert_eq!(draft.name.as_deref(), Some("Renamed Cup"));
    // Untouched dates keep their exact instants.
    assert_eq!(draft.date, Some(base.date));
    assert_eq!(draft.organizer.unwrap().id, "host@example.com");

    let updated = Tournament::try_from(submit(&form).unwrap()).unwrap();
    assert_eq!(updated.id, "t1");
}

#[test]
fn edit_keeps_start_instant_when_only_renamed() {
    let base = existing();
    let mut form = EditTournamentForm::new(Some(&base), &user(), today());
    form.set_name("Renamed");

    let draft = form.draft().unwrap();

    assert_eq!(draft.date.unwrap().from, 1_712_761_200_000);
    assert_eq!(draft.date.unwrap().to, Some(1_712_880_000_000));
}

#[test]
fn edit_with_changed_start_date_uses_midnight() {
    let base = existing();
    let mut form = EditTournamentForm::new(Some(&base), &user(), today());
    let end = form.values().to;
    form.set_dates(NaiveDate::from_ymd_opt(2024, 4, 11), end);

    let date = form.draft().unwrap().date.unwrap();

    // 2024-04-11T00:00:00Z; the untouched end keeps its instant.
    assert_eq!(date.from, 1_712_793_600_000);
    assert_eq!(date.to, Some(1_712_880_000_000));
}

#[test]
fn empty_name_and_organizer_are_rejected_before_callback() {
    let form = EditTournamentForm::new(None, &user(), today());
    let mut called = false;

    let errors = form.submit(|_| called = true).unwrap_err();

    assert!(!called);
    assert_eq!(errors.len(), 2);
    assert_eq!(errors.get(FormField::Name), Some(MIN_LENGTH_MESSAGE));
    assert_eq!(errors.get(FormField::Organizer), Some(MIN_LENGTH_MESSAGE));
    assert_eq!(errors.get(FormField::DateFrom), None);
}

#[test]
fn missing_start_date_is_required() {
    let mut form = EditTournamentForm::new(None, &user(), today());
    form.set_name("Cup A");
    form.set_organizer("Chess Club");
    form.set_dates(None, None);

    let errors = form.validate();

    assert_eq!(errors.len(), 1);
    assert_eq!(errors.get(FormField::DateFrom), Some(REQUIRED_MESSAGE));
    assert!(submit(&form).is_none());
}

#[test]
fn end_before_start_is_accepted() {
    let mut form = EditTournamentForm::new(None, &user(), today());
    form.set_name("Cup A");
    form.set_organizer("Chess Club");
    form.set_dates(NaiveDate::from_ymd_opt(2024, 3, 5), NaiveDate::from_ymd_opt(2024, 3, 1));

    assert!(form.validate().is_empty());
}

#[test]
fn close_only_invokes_callback() {
    let form = EditTournamentForm::new(None, &user(), today());
    let mut closed = false;

    form.close(|| closed = true);

    assert!(closed);
}
