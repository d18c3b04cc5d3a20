//! Manager tests against an in-memory [`AccountStore`].

use std::{
  collections::HashMap,
  convert::Infallible,
  sync::Mutex,
};

use chrono::NaiveDate;
use uuid::Uuid;

use crate::{
  Error, StaffManager,
  clock::FixedClock,
  staff::{Deletion, NationalId, StaffForm, StaffUser},
  store::{AccountStore, StoreOutcome, UpdateOutcome},
};

// ─── In-memory store ─────────────────────────────────────────────────────────

#[derive(Default)]
struct MemoryStore {
  users:                 Mutex<Vec<StaffUser>>,
  credentials:           Mutex<HashMap<Uuid, String>>,
  create_errors:         Option<Vec<String>>,
  add_credential_errors: Option<Vec<String>>,
  /// Report a conflict on every update; optionally delete the record first.
  conflict_on_update:    bool,
  vanish_on_conflict:    bool,
}

impl AccountStore for MemoryStore {
  type Error = Infallible;

  async fn list(&self) -> Result<Vec<StaffUser>, Infallible> {
    Ok(self.users.lock().unwrap().clone())
  }

  async fn find(&self, national_id: NationalId) -> Result<Option<StaffUser>, Infallible> {
    Ok(
      self
        .users
        .lock()
        .unwrap()
        .iter()
        .find(|u| u.national_id == national_id)
        .cloned(),
    )
  }

  async fn find_by_id(&self, id: Uuid) -> Result<Option<StaffUser>, Infallible> {
    Ok(self.users.lock().unwrap().iter().find(|u| u.id == id).cloned())
  }

  async fn create(&self, user: StaffUser, password: String) -> Result<StoreOutcome, Infallible> {
    if let Some(errors) = &self.create_errors {
      return Ok(StoreOutcome::Failed(errors.clone()));
    }
    self.credentials.lock().unwrap().insert(user.id, password);
    self.users.lock().unwrap().push(user);
    Ok(StoreOutcome::Succeeded)
  }

  async fn update(&self, mut user: StaffUser) -> Result<UpdateOutcome, Infallible> {
    let mut users = self.users.lock().unwrap();
    if self.conflict_on_update {
      if self.vanish_on_conflict {
        users.retain(|u| u.id != user.id);
      }
      return Ok(UpdateOutcome::ConcurrencyConflict);
    }
    let Some(slot) = users
      .iter_mut()
      .find(|u| u.id == user.id && u.concurrency_stamp == user.concurrency_stamp)
    else {
      return Ok(UpdateOutcome::ConcurrencyConflict);
    };
    user.concurrency_stamp = Uuid::new_v4();
    *slot = user.clone();
    Ok(UpdateOutcome::Updated(user))
  }

  async fn delete(&self, user: &StaffUser) -> Result<StoreOutcome, Infallible> {
    self.users.lock().unwrap().retain(|u| u.id != user.id);
    Ok(StoreOutcome::Succeeded)
  }

  async fn remove_credential(&self, user: &StaffUser) -> Result<StoreOutcome, Infallible> {
    self.credentials.lock().unwrap().remove(&user.id);
    Ok(StoreOutcome::Succeeded)
  }

  async fn add_credential(
    &self,
    user: &StaffUser,
    password: String,
  ) -> Result<StoreOutcome, Infallible> {
    if let Some(errors) = &self.add_credential_errors {
      return Ok(StoreOutcome::Failed(errors.clone()));
    }
    self.credentials.lock().unwrap().insert(user.id, password);
    Ok(StoreOutcome::Succeeded)
  }
}

// ─── Fixtures ────────────────────────────────────────────────────────────────

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
  NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn today() -> NaiveDate { date(2024, 6, 1) }

fn manager(store: MemoryStore) -> StaffManager<MemoryStore, FixedClock> {
  StaffManager::with_clock(store, FixedClock(today()))
}

fn ana() -> StaffForm {
  StaffForm {
    national_id: "1234567890".into(),
    first_name: "Ana".into(),
    middle_name: "Petrova".into(),
    last_name: "Ivanova".into(),
    hire_date: Some(date(2021, 3, 15)),
    active: true,
    email: Some("ana@hotel.example".into()),
    display_name: "ana".into(),
    ..Default::default()
  }
}

async fn with_ana() -> (StaffManager<MemoryStore, FixedClock>, StaffUser) {
  let m = manager(MemoryStore::default());
  let user = m.create(ana(), "Secret1!").await.unwrap();
  (m, user)
}

// ─── Create ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn create_persists_active_record_with_fresh_id() {
  let (m, user) = with_ana().await;

  assert!(user.active);
  assert_eq!(user.release_date, None);
  assert!(!user.id.is_nil());

  let stored = m.get_by_national_id("1234567890").await.unwrap();
  assert_eq!(stored, user);
  assert_eq!(
    m.store().credentials.lock().unwrap().get(&user.id).map(String::as_str),
    Some("Secret1!")
  );
}

#[tokio::test]
async fn create_forces_active_even_when_submitted_inactive() {
  let m = manager(MemoryStore::default());
  let mut form = ana();
  form.active = false;

  let user = m.create(form, "Secret1!").await.unwrap();
  assert!(user.active);
}

#[tokio::test]
async fn create_generates_distinct_ids() {
  let m = manager(MemoryStore::default());
  let a = m.create(ana(), "Secret1!").await.unwrap();
  let mut other = ana();
  other.national_id = "0987654321".into();
  other.display_name = "ana2".into();
  let b = m.create(other, "Secret1!").await.unwrap();
  assert_ne!(a.id, b.id);
}

#[tokio::test]
async fn create_reports_all_validation_errors() {
  let m = manager(MemoryStore::default());
  let mut form = ana();
  form.national_id = "123".into();
  form.first_name = String::new();

  let err = m.create(form, "").await.unwrap_err();
  let Error::Validation(errors) = err else {
    panic!("expected validation error, got {err:?}");
  };
  assert_eq!(errors, vec![
    "national id must be exactly 10 characters",
    "first name is required",
    "password is required",
  ]);
  assert!(m.list().await.unwrap().is_empty());
}

#[tokio::test]
async fn create_surfaces_store_descriptions() {
  let m = manager(MemoryStore {
    create_errors: Some(vec!["Passwords must have at least one digit.".into()]),
    ..Default::default()
  });

  let err = m.create(ana(), "Secret!").await.unwrap_err();
  assert!(matches!(
    err,
    Error::AccountStore(ref e) if e == &["Passwords must have at least one digit."]
  ));
}

// ─── Edit ────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn deactivate_then_reactivate() {
  let (m, _) = with_ana().await;

  let mut form = ana();
  form.active = false;
  let released = m.edit("1234567890", form).await.unwrap();
  assert!(!released.active);
  assert_eq!(released.release_date, Some(date(2024, 6, 1)));

  let mut form = ana();
  form.active = true;
  let back = m.edit("1234567890", form).await.unwrap();
  assert!(back.active);
  assert_eq!(back.release_date, None);
}

#[tokio::test]
async fn reinstate_clears_a_submitted_release_date() {
  let (m, _) = with_ana().await;

  let mut form = ana();
  form.active = false;
  form.release_date = Some(date(2024, 5, 1));
  let released = m.edit("1234567890", form).await.unwrap();

  // Redisplayed form still carries the old release date.
  let mut form = StaffForm::from(&released);
  assert_eq!(form.release_date, Some(date(2024, 5, 1)));
  form.active = true;

  let back = m.edit("1234567890", form).await.unwrap();
  assert!(back.active);
  assert_eq!(back.release_date, None);
}

#[tokio::test]
async fn active_record_staying_active_refuses_a_release_date() {
  let (m, created) = with_ana().await;

  let mut form = StaffForm::from(&created);
  form.release_date = Some(date(2024, 5, 1));
  let err = m.edit("1234567890", form).await.unwrap_err();
  assert!(matches!(
    err,
    Error::Validation(ref e)
      if e == &["release date can only be set for an inactive staff member"]
  ));
  assert_eq!(m.get_by_national_id("1234567890").await.unwrap(), created);
}

#[tokio::test]
async fn deactivate_with_explicit_release_date() {
  let (m, _) = with_ana().await;

  let mut form = ana();
  form.active = false;
  form.release_date = Some(date(2024, 5, 31));
  let user = m.edit("1234567890", form).await.unwrap();
  assert_eq!(user.release_date, Some(date(2024, 5, 31)));
}

#[tokio::test]
async fn unchanged_status_takes_submitted_release_date() {
  let (m, _) = with_ana().await;

  let mut form = ana();
  form.active = false;
  m.edit("1234567890", form.clone()).await.unwrap();

  form.release_date = Some(date(2024, 1, 10));
  let user = m.edit("1234567890", form.clone()).await.unwrap();
  assert_eq!(user.release_date, Some(date(2024, 1, 10)));

  form.release_date = None;
  let user = m.edit("1234567890", form).await.unwrap();
  assert!(!user.active);
  assert_eq!(user.release_date, None);
}

#[tokio::test]
async fn edit_copies_identity_fields_and_keeps_id() {
  let (m, created) = with_ana().await;

  let mut form = ana();
  form.first_name = "Anna".into();
  form.last_name = "Georgieva".into();
  form.phone_number = Some("+359 888 000 000".into());
  form.display_name = "anna.g".into();
  form.hire_date = Some(date(2022, 1, 1));

  let user = m.edit("1234567890", form).await.unwrap();
  assert_eq!(user.id, created.id);
  assert_eq!(user.first_name, "Anna");
  assert_eq!(user.last_name, "Georgieva");
  assert_eq!(user.phone_number.as_deref(), Some("+359 888 000 000"));
  assert_eq!(user.display_name, "anna.g");
  assert_eq!(user.hire_date, date(2022, 1, 1));
  assert_ne!(user.concurrency_stamp, created.concurrency_stamp);
}

#[tokio::test]
async fn edit_with_mismatched_key_is_not_found() {
  let (m, _) = with_ana().await;
  let err = m.edit("0987654321", ana()).await.unwrap_err();
  assert!(matches!(err, Error::NotFound(_)));
}

#[tokio::test]
async fn edit_of_missing_record_is_not_found() {
  let m = manager(MemoryStore::default());
  let err = m.edit("1234567890", ana()).await.unwrap_err();
  assert!(matches!(err, Error::NotFound(_)));
}

#[tokio::test]
async fn edit_validates_before_lookup() {
  let (m, _) = with_ana().await;
  let mut form = ana();
  form.middle_name = " ".into();
  let err = m.edit("1234567890", form).await.unwrap_err();
  assert!(matches!(err, Error::Validation(ref e) if e == &["middle name is required"]));
}

#[tokio::test]
async fn concurrent_edit_of_existing_record_is_conflict() {
  let m = manager(MemoryStore { conflict_on_update: true, ..Default::default() });
  m.create(ana(), "Secret1!").await.unwrap();

  let err = m.edit("1234567890", ana()).await.unwrap_err();
  assert!(matches!(err, Error::Conflict(ref id) if id.as_str() == "1234567890"));
}

#[tokio::test]
async fn concurrent_edit_of_vanished_record_is_not_found() {
  let m = manager(MemoryStore {
    conflict_on_update: true,
    vanish_on_conflict: true,
    ..Default::default()
  });
  m.create(ana(), "Secret1!").await.unwrap();

  let err = m.edit("1234567890", ana()).await.unwrap_err();
  assert!(matches!(err, Error::NotFound(_)));
}

// ─── Delete ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn delete_is_idempotent() {
  let (m, _) = with_ana().await;

  assert_eq!(m.delete("1234567890").await.unwrap(), Deletion::Deleted);
  assert_eq!(m.delete("1234567890").await.unwrap(), Deletion::Absent);
  assert_eq!(m.delete("not-an-egn").await.unwrap(), Deletion::Absent);
  assert!(m.list().await.unwrap().is_empty());
}

// ─── Search ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn search_distinguishes_blank_unknown_and_known() {
  let (m, user) = with_ana().await;

  assert!(matches!(
    m.search_by_national_id("").await,
    Err(Error::Validation(_))
  ));
  assert!(matches!(
    m.search_by_national_id("0000000000").await,
    Err(Error::NotFound(_))
  ));
  assert_eq!(m.search_by_national_id("1234567890").await.unwrap(), user);
}

#[tokio::test]
async fn malformed_key_is_simply_not_found() {
  let (m, _) = with_ana().await;
  assert!(matches!(m.get_by_national_id("42").await, Err(Error::NotFound(_))));
}

// ─── Passwords ───────────────────────────────────────────────────────────────

#[tokio::test]
async fn change_password_replaces_credential() {
  let (m, user) = with_ana().await;

  let notice = m.change_password(user.id, "N3w-secret").await.unwrap();
  assert_eq!(notice.message, "Password changed successfully");
  assert_eq!(
    m.store().credentials.lock().unwrap().get(&user.id).map(String::as_str),
    Some("N3w-secret")
  );
}

#[tokio::test]
async fn failed_add_after_remove_surfaces_add_errors() {
  let m = manager(MemoryStore {
    add_credential_errors: Some(vec![
      "Passwords must be at least 6 characters.".into(),
    ]),
    ..Default::default()
  });
  let user = m.create(ana(), "Secret1!").await.unwrap();

  let err = m.change_password(user.id, "x").await.unwrap_err();
  assert!(matches!(
    err,
    Error::AccountStore(ref e) if e == &["Passwords must be at least 6 characters."]
  ));
  assert!(!m.store().credentials.lock().unwrap().contains_key(&user.id));
}

#[tokio::test]
async fn change_password_rejects_empty_and_unknown() {
  let (m, user) = with_ana().await;

  assert!(matches!(
    m.change_password(user.id, "").await,
    Err(Error::Validation(_))
  ));
  assert!(matches!(
    m.change_password(Uuid::new_v4(), "Secret2!").await,
    Err(Error::NotFound(_))
  ));
}

#[tokio::test]
async fn password_target_shows_first_and_last_name() {
  let (m, user) = with_ana().await;
  let target = m.password_target(user.id).await.unwrap();
  assert_eq!(target.user_id, user.id);
  assert_eq!(target.full_name, "Ana Ivanova");
}

// ─── Draft ───────────────────────────────────────────────────────────────────

#[test]
fn draft_is_active_and_hired_today() {
  let m = manager(MemoryStore::default());
  let form = m.draft();
  assert!(form.active);
  assert_eq!(form.hire_date, Some(today()));
  assert!(form.national_id.is_empty());
}
