//! Shared embedded PostgreSQL helpers for integration tests.
//!
//! - Schema setup runs the backend's embedded Diesel migrations once per
//!   migration set into a template database, so test schemas do not drift.
//! - Each test clones the template into its own temporary database.
//! - Raw SQL helpers use `postgres` to avoid Diesel transaction semantics.

use std::path::PathBuf;
use std::sync::{Mutex, OnceLock};
use std::time::Duration;

use backend::outbound::persistence::run_migrations;
use pg_embedded_setup_unpriv::test_support::hash_directory;
use pg_embedded_setup_unpriv::{ClusterHandle, TemporaryDatabase};
use postgres::{Client, NoTls};
use uuid::Uuid;

use super::format_postgres_error;

static TEMPLATE_LOCK: OnceLock<Mutex<()>> = OnceLock::new();

const TEMPLATE_NAME_PREFIX: &str = "leads_template";
const TEMPLATE_PROVISION_RETRIES: usize = 5;
const TEMPLATE_PROVISION_RETRY_DELAY: Duration = Duration::from_millis(500);

fn migrations_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("migrations")
}

fn template_database_name() -> Result<String, String> {
    let hash = hash_directory(migrations_dir()).map_err(|err| format!("hash migrations: {err}"))?;
    let short_hash = hash.get(..8).unwrap_or(&hash);
    Ok(format!("{TEMPLATE_NAME_PREFIX}_{short_hash}"))
}

/// Creates or reuses a template database with the latest migrations applied.
fn ensure_template_database(cluster: &ClusterHandle) -> Result<String, String> {
    let template_name = template_database_name()?;
    let _lock = TEMPLATE_LOCK
        .get_or_init(|| Mutex::new(()))
        .lock()
        .unwrap_or_else(|err| err.into_inner());

    let exists = cluster
        .database_exists(template_name.as_str())
        .map_err(|err| format!("template check: {err:?}"))?;

    if !exists {
        cluster
            .create_database(template_name.as_str())
            .map_err(|err| format!("create template: {err:?}"))?;

        let url = cluster.connection().database_url(&template_name);
        run_migrations(&url).map_err(|err| err.to_string())?;
    }

    Ok(template_name)
}

fn provision_template_database_attempt(
    cluster: &ClusterHandle,
    attempt: usize,
) -> Result<TemporaryDatabase, String> {
    let template_name = ensure_template_database(cluster).map_err(|error| {
        format!("template check: attempt {attempt}/{TEMPLATE_PROVISION_RETRIES}: {error}")
    })?;
    let db_name = format!("test_{}", Uuid::new_v4());
    cluster
        .temporary_database_from_template(db_name.as_str(), template_name.as_str())
        .map_err(|error| {
            format!(
                "create database from template: attempt {attempt}/{TEMPLATE_PROVISION_RETRIES}: {error:?}"
            )
        })
}

/// Provisions a temporary database cloned from the migration template.
pub fn provision_template_database(cluster: &ClusterHandle) -> Result<TemporaryDatabase, String> {
    let mut last_error = None;
    for attempt in 1..=TEMPLATE_PROVISION_RETRIES {
        match provision_template_database_attempt(cluster, attempt) {
            Ok(database) => return Ok(database),
            Err(error) => last_error = Some(error),
        };
        if attempt < TEMPLATE_PROVISION_RETRIES {
            std::thread::sleep(TEMPLATE_PROVISION_RETRY_DELAY);
        }
    }

    Err(last_error.unwrap_or_else(|| "create database from template: exhausted retries".to_owned()))
}

/// Run raw SQL against the given database.
pub fn execute_sql(url: &str, sql: &str) -> Result<(), String> {
    let mut client =
        Client::connect(url, NoTls).map_err(|err| format_postgres_error(&err))?;
    client
        .batch_execute(sql)
        .map_err(|err| format_postgres_error(&err))
}

/// Read the stored `password_hash` column for every user row.
pub fn stored_password_hashes(url: &str) -> Result<Vec<String>, String> {
    let mut client =
        Client::connect(url, NoTls).map_err(|err| format_postgres_error(&err))?;
    let rows = client
        .query("SELECT password_hash FROM users", &[])
        .map_err(|err| format_postgres_error(&err))?;
    Ok(rows.iter().map(|row| row.get(0)).collect())
}

/// Read `(claimed_by IS NULL, is_public)` for every lead row.
pub fn visibility_pairs(url: &str) -> Result<Vec<(bool, bool)>, String> {
    let mut client =
        Client::connect(url, NoTls).map_err(|err| format_postgres_error(&err))?;
    let rows = client
        .query("SELECT claimed_by IS NULL, is_public FROM leads", &[])
        .map_err(|err| format_postgres_error(&err))?;
    Ok(rows.iter().map(|row| (row.get(0), row.get(1))).collect())
}
