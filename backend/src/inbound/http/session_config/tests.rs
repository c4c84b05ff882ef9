//! Unit tests for session configuration resolution.

use super::*;
use rstest::{fixture, rstest};
use uuid::Uuid;

#[derive(Debug)]
struct TempKeyFile {
    path: PathBuf,
}

impl TempKeyFile {
    fn new(len: usize) -> std::io::Result<Self> {
        let path = std::env::temp_dir().join(format!("session-key-{}", Uuid::new_v4()));
        std::fs::write(&path, vec![b'a'; len])?;
        Ok(Self { path })
    }
}

impl Drop for TempKeyFile {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.path);
    }
}

fn settings_with_key(path: Option<PathBuf>) -> ServerSettings {
    ServerSettings {
        bind_addr: None,
        database_url: None,
        db_max_connections: None,
        session_key_file: path,
        session_allow_ephemeral: false,
        cookie_secure: Some(true),
        same_site: None,
        seed_demo_data: false,
    }
}

#[fixture]
fn full_key() -> TempKeyFile {
    TempKeyFile::new(SESSION_KEY_MIN_LEN).expect("key file creation should succeed")
}

fn missing_key_path() -> PathBuf {
    std::env::temp_dir().join(format!("missing-session-key-{}", Uuid::new_v4()))
}

fn expect_error(
    result: Result<SessionSettings, SessionConfigError>,
    label: &str,
) -> SessionConfigError {
    match result {
        Ok(_) => panic!("{label}"),
        Err(error) => error,
    }
}

#[rstest]
fn release_valid_settings_succeed(full_key: TempKeyFile) {
    let settings = settings_with_key(Some(full_key.path.clone()));

    let resolved =
        session_settings(&settings, BuildMode::Release).expect("expected valid settings");
    assert!(resolved.cookie_secure);
    assert_eq!(resolved.same_site, SameSite::Strict);
}

#[rstest]
fn release_missing_key_file_is_rejected() {
    let settings = settings_with_key(Some(missing_key_path()));

    let err = expect_error(
        session_settings(&settings, BuildMode::Release),
        "expected missing key file to fail",
    );
    assert!(matches!(err, SessionConfigError::KeyRead { .. }));
}

#[rstest]
fn release_allows_ephemeral_key_when_opted_in() {
    let mut settings = settings_with_key(Some(missing_key_path()));
    settings.session_allow_ephemeral = true;

    assert!(session_settings(&settings, BuildMode::Release).is_ok());
}

#[rstest]
fn release_short_key_is_rejected() {
    let key_file = TempKeyFile::new(32).expect("key file creation should succeed");
    let settings = settings_with_key(Some(key_file.path.clone()));

    let err = expect_error(
        session_settings(&settings, BuildMode::Release),
        "expected short key to fail",
    );
    assert!(matches!(
        err,
        SessionConfigError::KeyTooShort { length: 32, .. }
    ));
}

#[rstest]
fn debug_tolerates_keys_too_short_to_derive_from() {
    let key_file = TempKeyFile::new(8).expect("key file creation should succeed");
    let settings = settings_with_key(Some(key_file.path.clone()));

    assert!(session_settings(&settings, BuildMode::Debug).is_ok());
}

#[rstest]
fn release_insecure_none_same_site_is_rejected(full_key: TempKeyFile) {
    let mut settings = settings_with_key(Some(full_key.path.clone()));
    settings.cookie_secure = Some(false);
    settings.same_site = Some("None".to_owned());

    let err = expect_error(
        session_settings(&settings, BuildMode::Release),
        "expected insecure SameSite=None to fail",
    );
    assert!(matches!(err, SessionConfigError::InsecureSameSiteNone));
}

#[rstest]
fn release_unknown_same_site_is_rejected(full_key: TempKeyFile) {
    let mut settings = settings_with_key(Some(full_key.path.clone()));
    settings.same_site = Some("sometimes".to_owned());

    let err = expect_error(
        session_settings(&settings, BuildMode::Release),
        "expected unknown SameSite to fail",
    );
    assert!(matches!(err, SessionConfigError::InvalidSameSite { .. }));
}

#[rstest]
#[case("lax", SameSite::Lax)]
#[case("Strict", SameSite::Strict)]
#[case("NONE", SameSite::None)]
fn same_site_values_are_case_insensitive(
    full_key: TempKeyFile,
    #[case] raw: &str,
    #[case] expected: SameSite,
) {
    let mut settings = settings_with_key(Some(full_key.path.clone()));
    settings.same_site = Some(raw.to_owned());

    let resolved = session_settings(&settings, BuildMode::Release).expect("valid settings");
    assert_eq!(resolved.same_site, expected);
}

#[rstest]
fn debug_defaults_allow_ephemeral_key() {
    let settings = settings_with_key(Some(missing_key_path()));

    let resolved =
        session_settings(&settings, BuildMode::Debug).expect("debug defaults should succeed");
    assert!(resolved.cookie_secure);
    assert_eq!(resolved.same_site, SameSite::Lax);
}

#[rstest]
fn debug_invalid_same_site_falls_back_to_default(full_key: TempKeyFile) {
    let mut settings = settings_with_key(Some(full_key.path.clone()));
    settings.same_site = Some("unexpected".to_owned());

    let resolved = session_settings(&settings, BuildMode::Debug)
        .expect("debug should fall back to defaults");
    assert_eq!(resolved.same_site, SameSite::Lax);
}
