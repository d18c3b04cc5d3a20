//! SQL schema for the staff account store.
//!
//! Executed once at connection startup. Future migrations will be gated on
//! `PRAGMA user_version`.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;

CREATE TABLE IF NOT EXISTS staff_users (
    id                TEXT PRIMARY KEY,
    national_id       TEXT NOT NULL UNIQUE,
    first_name        TEXT NOT NULL,
    middle_name       TEXT NOT NULL,
    last_name         TEXT NOT NULL,
    hire_date         TEXT NOT NULL,   -- YYYY-MM-DD
    active            INTEGER NOT NULL DEFAULT 1,
    release_date      TEXT,            -- YYYY-MM-DD or NULL while active
    email             TEXT,
    phone_number      TEXT,
    display_name      TEXT NOT NULL,
    -- Uppercased display name; uniqueness is case-insensitive.
    normalized_name   TEXT NOT NULL UNIQUE,
    password_hash     TEXT,            -- argon2 PHC string; NULL = no credential
    concurrency_stamp TEXT NOT NULL,
    CHECK (release_date IS NULL OR active = 0)
);

CREATE INDEX IF NOT EXISTS staff_users_name_idx
    ON staff_users(last_name, first_name, middle_name);

PRAGMA user_version = 1;
";
