//! [`SqliteStore`] — the SQLite implementation of [`AccountStore`].

use std::path::Path;

use argon2::{
  Argon2, PasswordHash, PasswordHasher, PasswordVerifier,
  password_hash::SaltString,
};
use rand_core::OsRng;
use rusqlite::OptionalExtension as _;
use tracing::debug;
use uuid::Uuid;

use staff_core::{
  staff::{NationalId, StaffUser},
  store::{AccountStore, StoreOutcome, UpdateOutcome},
};

use crate::{
  Error, PasswordPolicy, Result,
  encode::{RawStaffUser, encode_date, encode_uuid, normalize_name},
  schema::SCHEMA,
};

const GONE: &str = "Staff account no longer exists.";

// ─── Queries ─────────────────────────────────────────────────────────────────

const SELECT_BY_ID: &str = "SELECT id, national_id, first_name, middle_name,
  last_name, hire_date, active, release_date, email, phone_number,
  display_name, concurrency_stamp
  FROM staff_users WHERE id = ?1";

const SELECT_BY_NATIONAL_ID: &str = "SELECT id, national_id, first_name,
  middle_name, last_name, hire_date, active, release_date, email,
  phone_number, display_name, concurrency_stamp
  FROM staff_users WHERE national_id = ?1";

const SELECT_ALL: &str = "SELECT id, national_id, first_name, middle_name,
  last_name, hire_date, active, release_date, email, phone_number,
  display_name, concurrency_stamp
  FROM staff_users ORDER BY last_name, first_name, middle_name";

const NATIONAL_ID_TAKEN: &str =
  "SELECT 1 FROM staff_users WHERE national_id = ?1 AND id != ?2";

const NAME_TAKEN: &str =
  "SELECT 1 FROM staff_users WHERE normalized_name = ?1 AND id != ?2";

// ─── Store ───────────────────────────────────────────────────────────────────

/// Staff accounts backed by a single SQLite file.
///
/// Cloning is cheap — the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn:   tokio_rusqlite::Connection,
  policy: PasswordPolicy,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn, policy: PasswordPolicy::default() };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store — useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn, policy: PasswordPolicy::default() };
    store.init_schema().await?;
    Ok(store)
  }

  /// Replace the default password policy.
  pub fn with_policy(mut self, policy: PasswordPolicy) -> Self {
    self.policy = policy;
    self
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  /// Check a password against the stored credential for a user name.
  ///
  /// Returns `false` for unknown names and for accounts with no credential.
  pub async fn verify_credential(&self, display_name: &str, password: &str) -> Result<bool> {
    let normalized = normalize_name(display_name);
    let hash: Option<String> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              "SELECT password_hash FROM staff_users WHERE normalized_name = ?1",
              rusqlite::params![normalized],
              |r| r.get::<_, Option<String>>(0),
            )
            .optional()?
            .flatten(),
        )
      })
      .await?;

    let Some(hash) = hash else { return Ok(false) };
    let parsed = PasswordHash::new(&hash).map_err(|e| Error::PasswordHash(e.to_string()))?;
    Ok(
      Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok(),
    )
  }

  async fn select_one(&self, sql: &'static str, key: String) -> Result<Option<StaffUser>> {
    let raw: Option<RawStaffUser> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(sql, rusqlite::params![key], RawStaffUser::from_row)
            .optional()?,
        )
      })
      .await?;

    raw.map(RawStaffUser::into_user).transpose()
  }

  /// Whether `sql` finds `value` on a row other than `exclude`.
  async fn taken(&self, sql: &'static str, value: String, exclude: Option<Uuid>) -> Result<bool> {
    let exclude = exclude.map(encode_uuid).unwrap_or_default();
    let taken = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(sql, rusqlite::params![value, exclude], |_| Ok(true))
            .optional()?
            .unwrap_or(false),
        )
      })
      .await?;
    Ok(taken)
  }

  async fn exists(&self, id: Uuid) -> Result<bool> {
    Ok(self.select_one(SELECT_BY_ID, encode_uuid(id)).await?.is_some())
  }

  /// Descriptions for a user name that is blank or held by someone else.
  async fn check_display_name(&self, name: &str, owner: Option<Uuid>) -> Result<Vec<String>> {
    if name.trim().is_empty() {
      return Ok(vec!["User name is required.".to_owned()]);
    }
    if self.taken(NAME_TAKEN, normalize_name(name), owner).await? {
      return Ok(vec![format!("User name '{name}' is already taken.")]);
    }
    Ok(Vec::new())
  }
}

async fn hash_password(password: String) -> Result<String> {
  tokio::task::spawn_blocking(move || {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
      .hash_password(password.as_bytes(), &salt)
      .map(|h| h.to_string())
  })
  .await
  .map_err(|e| Error::PasswordHash(e.to_string()))?
  .map_err(|e| Error::PasswordHash(e.to_string()))
}

/// The column named by a UNIQUE constraint failure, e.g. `national_id` from
/// "UNIQUE constraint failed: staff_users.national_id".
fn unique_violation(e: &rusqlite::Error) -> Option<String> {
  match e {
    rusqlite::Error::SqliteFailure(failure, Some(message))
      if failure.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE =>
    {
      message.rsplit_once('.').map(|(_, column)| column.to_owned())
    }
    _ => None,
  }
}

/// Run a write, turning a UNIQUE failure into the name of the clashing column
/// instead of an error. Uniqueness is checked up front too; this covers a
/// concurrent writer that got there in between.
fn write_unique(
  conn: &rusqlite::Connection,
  sql: &str,
  params: impl rusqlite::Params,
) -> tokio_rusqlite::Result<Result<usize, String>> {
  match conn.execute(sql, params) {
    Ok(changed) => Ok(Ok(changed)),
    Err(e) => match unique_violation(&e) {
      Some(column) => Ok(Err(column)),
      None => Err(e.into()),
    },
  }
}

fn taken_description(column: &str, national_id: &NationalId, display_name: &str) -> String {
  match column {
    "national_id" => format!("National id '{national_id}' is already taken."),
    "normalized_name" => format!("User name '{display_name}' is already taken."),
    other => format!("'{other}' is already taken."),
  }
}

// ─── AccountStore impl ───────────────────────────────────────────────────────

impl AccountStore for SqliteStore {
  type Error = Error;

  async fn list(&self) -> Result<Vec<StaffUser>> {
    let raws: Vec<RawStaffUser> = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare(SELECT_ALL)?;
        let rows = stmt
          .query_map([], RawStaffUser::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawStaffUser::into_user).collect()
  }

  async fn find(&self, national_id: NationalId) -> Result<Option<StaffUser>> {
    self.select_one(SELECT_BY_NATIONAL_ID, national_id.to_string()).await
  }

  async fn find_by_id(&self, id: Uuid) -> Result<Option<StaffUser>> {
    self.select_one(SELECT_BY_ID, encode_uuid(id)).await
  }

  async fn create(&self, user: StaffUser, password: String) -> Result<StoreOutcome> {
    let mut errors = Vec::new();
    if self
      .taken(NATIONAL_ID_TAKEN, user.national_id.to_string(), None)
      .await?
    {
      errors.push(format!("National id '{}' is already taken.", user.national_id));
    }
    errors.extend(self.check_display_name(&user.display_name, None).await?);
    errors.extend(self.policy.check(&password));
    if !errors.is_empty() {
      return Ok(StoreOutcome::Failed(errors));
    }

    let hash = hash_password(password).await?;
    let normalized = normalize_name(&user.display_name);
    let (national_id, display_name) = (user.national_id.clone(), user.display_name.clone());

    let inserted = self
      .conn
      .call(move |conn| {
        write_unique(
          conn,
          "INSERT INTO staff_users (
             id, national_id, first_name, middle_name, last_name, hire_date,
             active, release_date, email, phone_number, display_name,
             normalized_name, password_hash, concurrency_stamp
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14)",
          rusqlite::params![
            encode_uuid(user.id),
            user.national_id.as_str(),
            user.first_name,
            user.middle_name,
            user.last_name,
            encode_date(user.hire_date),
            user.active,
            user.release_date.map(encode_date),
            user.email,
            user.phone_number,
            user.display_name,
            normalized,
            hash,
            encode_uuid(user.concurrency_stamp),
          ],
        )
      })
      .await?;

    if let Err(column) = inserted {
      debug!(%column, "lost a uniqueness race on create");
      return Ok(StoreOutcome::Failed(vec![taken_description(
        &column,
        &national_id,
        &display_name,
      )]));
    }

    Ok(StoreOutcome::Succeeded)
  }

  async fn update(&self, mut user: StaffUser) -> Result<UpdateOutcome> {
    let errors = self.check_display_name(&user.display_name, Some(user.id)).await?;
    if !errors.is_empty() {
      return Ok(UpdateOutcome::Failed(errors));
    }

    let expected = encode_uuid(user.concurrency_stamp);
    user.concurrency_stamp = Uuid::new_v4();
    let row = user.clone();
    let normalized = normalize_name(&row.display_name);

    let changed = self
      .conn
      .call(move |conn| {
        write_unique(
          conn,
          "UPDATE staff_users SET
             first_name = ?3, middle_name = ?4, last_name = ?5, hire_date = ?6,
             active = ?7, release_date = ?8, email = ?9, phone_number = ?10,
             display_name = ?11, normalized_name = ?12, concurrency_stamp = ?13
           WHERE id = ?1 AND concurrency_stamp = ?2",
          rusqlite::params![
            encode_uuid(row.id),
            expected,
            row.first_name,
            row.middle_name,
            row.last_name,
            encode_date(row.hire_date),
            row.active,
            row.release_date.map(encode_date),
            row.email,
            row.phone_number,
            row.display_name,
            normalized,
            encode_uuid(row.concurrency_stamp),
          ],
        )
      })
      .await?;

    let changed = match changed {
      Ok(changed) => changed,
      Err(column) => {
        debug!(id = %user.id, %column, "lost a uniqueness race on update");
        return Ok(UpdateOutcome::Failed(vec![taken_description(
          &column,
          &user.national_id,
          &user.display_name,
        )]));
      }
    };

    if changed == 0 {
      debug!(id = %user.id, "stale concurrency stamp on update");
      return Ok(UpdateOutcome::ConcurrencyConflict);
    }
    Ok(UpdateOutcome::Updated(user))
  }

  async fn delete(&self, user: &StaffUser) -> Result<StoreOutcome> {
    let id_str = encode_uuid(user.id);
    let removed = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "DELETE FROM staff_users WHERE id = ?1",
          rusqlite::params![id_str],
        )?)
      })
      .await?;

    if removed == 0 {
      debug!(id = %user.id, "delete of already-absent staff account");
    }
    Ok(StoreOutcome::Succeeded)
  }

  async fn remove_credential(&self, user: &StaffUser) -> Result<StoreOutcome> {
    let id_str = encode_uuid(user.id);
    let changed = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "UPDATE staff_users SET password_hash = NULL WHERE id = ?1",
          rusqlite::params![id_str],
        )?)
      })
      .await?;

    if changed == 0 {
      return Ok(StoreOutcome::failed(GONE));
    }
    Ok(StoreOutcome::Succeeded)
  }

  async fn add_credential(&self, user: &StaffUser, password: String) -> Result<StoreOutcome> {
    let errors = self.policy.check(&password);
    if !errors.is_empty() {
      return Ok(StoreOutcome::Failed(errors));
    }

    let hash = hash_password(password).await?;
    let id_str = encode_uuid(user.id);
    let changed = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "UPDATE staff_users SET password_hash = ?2
           WHERE id = ?1 AND password_hash IS NULL",
          rusqlite::params![id_str, hash],
        )?)
      })
      .await?;

    if changed == 0 {
      return Ok(if self.exists(user.id).await? {
        StoreOutcome::failed("User already has a password set.")
      } else {
        StoreOutcome::failed(GONE)
      });
    }
    Ok(StoreOutcome::Succeeded)
  }
}
