//! [`StaffManager`] — validation and lifecycle rules in front of an
//! [`AccountStore`].

use tracing::{error, info, warn};
use uuid::Uuid;

use crate::{
  Error, Result,
  clock::{Clock, SystemClock},
  lifecycle::Transition,
  staff::{Deletion, NationalId, Notice, PasswordTarget, StaffForm, StaffUser},
  store::{AccountStore, StoreOutcome, UpdateOutcome},
  validation::search_term,
};

/// Owns the lifecycle of staff records and delegates storage to `S`.
///
/// Holds no mutable state of its own; every operation is a single-record
/// round trip to the store.
#[derive(Debug)]
pub struct StaffManager<S, C = SystemClock> {
  store: S,
  clock: C,
}

impl<S: AccountStore> StaffManager<S> {
  pub fn new(store: S) -> Self { Self { store, clock: SystemClock } }
}

impl<S: AccountStore, C: Clock> StaffManager<S, C> {
  pub fn with_clock(store: S, clock: C) -> Self { Self { store, clock } }

  pub fn store(&self) -> &S { &self.store }

  /// A blank form for a new hire: active, hired today.
  pub fn draft(&self) -> StaffForm {
    StaffForm {
      active: true,
      hire_date: Some(self.clock.today()),
      ..Default::default()
    }
  }

  // ── Reads ─────────────────────────────────────────────────────────────────

  pub async fn list(&self) -> Result<Vec<StaffUser>> {
    self.store.list().await.map_err(Error::store)
  }

  pub async fn get_by_national_id(&self, national_id: &str) -> Result<StaffUser> {
    self
      .lookup(national_id)
      .await?
      .ok_or_else(|| not_found(national_id))
  }

  /// Like [`Self::get_by_national_id`], but a blank search term is a
  /// validation error rather than a miss.
  pub async fn search_by_national_id(&self, raw: &str) -> Result<StaffUser> {
    let term = search_term(raw)?;
    self.lookup(term).await?.ok_or_else(|| {
      Error::NotFound(format!("no staff member with national id {term}"))
    })
  }

  pub async fn password_target(&self, id: Uuid) -> Result<PasswordTarget> {
    let user = self.find_by_id(id).await?;
    Ok(PasswordTarget { user_id: user.id, full_name: user.full_name() })
  }

  // ── Writes ────────────────────────────────────────────────────────────────

  /// Validate and persist a new account. The account always starts active.
  pub async fn create(&self, form: StaffForm, password: &str) -> Result<StaffUser> {
    let (valid, mut errors) = match form.validate() {
      Ok(valid) => (Some(valid), Vec::new()),
      Err(Error::Validation(errors)) => (None, errors),
      Err(other) => return Err(other),
    };
    if password.is_empty() {
      errors.push("password is required".to_owned());
    }
    let valid = match valid {
      Some(valid) if errors.is_empty() => valid,
      _ => return Err(Error::Validation(errors)),
    };

    let user = StaffUser {
      id:                Uuid::new_v4(),
      national_id:       valid.national_id,
      first_name:        form.first_name,
      middle_name:       form.middle_name,
      last_name:         form.last_name,
      hire_date:         valid.hire_date,
      active:            true,
      release_date:      None,
      email:             form.email,
      phone_number:      form.phone_number,
      display_name:      form.display_name,
      concurrency_stamp: Uuid::new_v4(),
    };

    match self
      .store
      .create(user.clone(), password.to_owned())
      .await
      .map_err(Error::store)?
    {
      StoreOutcome::Succeeded => {
        info!(id = %user.id, national_id = %user.national_id, "created staff account");
        Ok(user)
      }
      StoreOutcome::Failed(errors) => Err(Error::AccountStore(errors)),
    }
  }

  /// Apply an edit to the record keyed by `national_id`.
  ///
  /// Identity fields are copied from the form; `active` and `release_date`
  /// go through the [`crate::lifecycle::Transition`] rule.
  pub async fn edit(&self, national_id: &str, form: StaffForm) -> Result<StaffUser> {
    if form.national_id != national_id {
      return Err(not_found(national_id));
    }
    let valid = form.validate()?;

    let mut user = self
      .store
      .find(valid.national_id.clone())
      .await
      .map_err(Error::store)?
      .ok_or_else(|| not_found(national_id))?;

    if !Transition::between(user.active, form.active).admits(form.active, form.release_date) {
      return Err(Error::Validation(vec![
        "release date can only be set for an inactive staff member".to_owned(),
      ]));
    }

    user.first_name = form.first_name;
    user.middle_name = form.middle_name;
    user.last_name = form.last_name;
    user.email = form.email;
    user.phone_number = form.phone_number;
    user.display_name = form.display_name;
    user.hire_date = valid.hire_date;
    let transition =
      user.apply_status(form.active, form.release_date, self.clock.today());

    match self.store.update(user).await.map_err(Error::store)? {
      UpdateOutcome::Updated(user) => {
        info!(national_id = %user.national_id, ?transition, "updated staff account");
        Ok(user)
      }
      UpdateOutcome::Failed(errors) => Err(Error::AccountStore(errors)),
      UpdateOutcome::ConcurrencyConflict => {
        let still_there = self
          .store
          .find(valid.national_id.clone())
          .await
          .map_err(Error::store)?
          .is_some();
        if still_there {
          warn!(%national_id, "concurrent modification of staff account");
          Err(Error::Conflict(valid.national_id))
        } else {
          Err(not_found(national_id))
        }
      }
    }
  }

  /// Hard-delete the record if it exists. Deleting an absent record is a
  /// no-op.
  pub async fn delete(&self, national_id: &str) -> Result<Deletion> {
    let Some(user) = self.lookup(national_id).await? else {
      return Ok(Deletion::Absent);
    };
    match self.store.delete(&user).await.map_err(Error::store)? {
      StoreOutcome::Succeeded => {
        info!(id = %user.id, %national_id, "deleted staff account");
        Ok(Deletion::Deleted)
      }
      StoreOutcome::Failed(errors) => Err(Error::AccountStore(errors)),
    }
  }

  /// Replace the account's password by removing the old credential and adding
  /// the new one.
  ///
  /// The two steps are separate store calls. If the removal succeeds and the
  /// addition fails, the account is left with no usable password; the
  /// addition's errors are returned and the gap is logged. Stores that can
  /// replace a credential atomically should be preferred where available.
  pub async fn change_password(&self, id: Uuid, new_password: &str) -> Result<Notice> {
    if new_password.is_empty() {
      return Err(Error::Validation(vec!["new password is required".to_owned()]));
    }
    let user = self.find_by_id(id).await?;

    if let StoreOutcome::Failed(errors) =
      self.store.remove_credential(&user).await.map_err(Error::store)?
    {
      return Err(Error::AccountStore(errors));
    }

    match self
      .store
      .add_credential(&user, new_password.to_owned())
      .await
      .map_err(Error::store)?
    {
      StoreOutcome::Succeeded => {
        info!(%id, "changed staff account password");
        Ok(Notice::new("Password changed successfully"))
      }
      StoreOutcome::Failed(errors) => {
        error!(
          %id,
          ?errors,
          "password removed but new password rejected; account has no credential"
        );
        Err(Error::AccountStore(errors))
      }
    }
  }

  // ── Helpers ───────────────────────────────────────────────────────────────

  /// Find by national id; a key that cannot be a national id simply misses.
  async fn lookup(&self, national_id: &str) -> Result<Option<StaffUser>> {
    let Ok(key) = NationalId::parse(national_id) else {
      return Ok(None);
    };
    self.store.find(key).await.map_err(Error::store)
  }

  async fn find_by_id(&self, id: Uuid) -> Result<StaffUser> {
    self
      .store
      .find_by_id(id)
      .await
      .map_err(Error::store)?
      .ok_or_else(|| Error::NotFound(format!("staff account {id}")))
  }
}

fn not_found(national_id: &str) -> Error {
  Error::NotFound(format!("staff member {national_id}"))
}
