//! Integration tests for `DieselUserRepository` against embedded PostgreSQL.
//!
//! Staff accounts are stored with an Argon2 digest and looked up by email at
//! login and by id on every authenticated request. These tests check the
//! round trip, the unique email constraint, and that the plaintext password
//! never reaches the table.
//!
//! # Runtime Strategy
//!
//! Steps are synchronous and reuse a shared Tokio runtime in the test context.
use std::sync::{Arc, Mutex};

use backend::domain::ports::{UserPersistenceError, UserRepository};
use backend::domain::{EmailAddress, PasswordDigest, User, UserAccount, UserId};
use backend::outbound::persistence::{DbPool, DieselUserRepository, PoolConfig};
use pg_embedded_setup_unpriv::TemporaryDatabase;
use rstest::{fixture, rstest};
use rstest_bdd_macros::{given, then, when};
use tokio::runtime::Runtime;

#[path = "support/pg_embed.rs"]
mod pg_embed;

mod support;

use pg_embed::shared_cluster;
use support::embedded_postgres::{execute_sql, stored_password_hashes};
use support::{handle_cluster_setup_failure, provision_template_database};

// -----------------------------------------------------------------------------
// Fixtures
// -----------------------------------------------------------------------------

const STAFF_PASSWORD: &str = "password123";

fn account_for(email: &str) -> UserAccount {
    let user = User::try_from_strings(UserId::random(), "Jane Advisor", email).expect("valid user");
    UserAccount::new(user, PasswordDigest::hash(STAFF_PASSWORD).expect("hash"))
}

#[fixture]
fn staff_account() -> UserAccount {
    account_for("jane@example.com")
}

// -----------------------------------------------------------------------------
// Test Context
// -----------------------------------------------------------------------------

struct TestContext {
    /// Tokio runtime reused for all async operations in this test.
    runtime: Runtime,
    repository: DieselUserRepository,
    database_url: String,
    last_create_error: Option<UserPersistenceError>,
    last_fetch_result: Option<Result<Option<User>, UserPersistenceError>>,
    last_email_result: Option<Result<Option<UserAccount>, UserPersistenceError>>,
    _database: TemporaryDatabase,
}

type SharedContext = Arc<Mutex<TestContext>>;

/// Extracts values from the locked context, executes an async operation,
/// and updates the context with the result.
fn with_context_async<F, R, U>(
    world: &SharedContext,
    extract: impl FnOnce(&TestContext) -> F,
    operation: impl FnOnce(DieselUserRepository, F) -> R,
    update: U,
) where
    R: std::future::Future,
    U: FnOnce(&mut TestContext, R::Output),
{
    let (repo, handle, extracted) = {
        let ctx = world.lock().expect("context lock");
        (
            ctx.repository.clone(),
            ctx.runtime.handle().clone(),
            extract(&ctx),
        )
    };
    let result = handle.block_on(operation(repo, extracted));
    let mut ctx = world.lock().expect("context lock");
    update(&mut ctx, result);
}

fn setup_test_context() -> Result<TestContext, String> {
    let runtime = Runtime::new().map_err(|err| err.to_string())?;
    let cluster = shared_cluster()?;
    let temp_db = provision_template_database(cluster)?;
    let database_url = temp_db.url().to_string();

    let config = PoolConfig::new(&database_url)
        .with_max_size(2)
        .with_min_idle(Some(1));
    let pool = runtime
        .block_on(async { DbPool::new(config).await })
        .map_err(|err| err.to_string())?;

    Ok(TestContext {
        runtime,
        repository: DieselUserRepository::new(pool),
        database_url,
        last_create_error: None,
        last_fetch_result: None,
        last_email_result: None,
        _database: temp_db,
    })
}

#[fixture]
fn diesel_world() -> Option<SharedContext> {
    match setup_test_context() {
        Ok(ctx) => Some(Arc::new(Mutex::new(ctx))),
        Err(reason) => handle_cluster_setup_failure(reason),
    }
}

// -----------------------------------------------------------------------------
// BDD Step Definitions
// -----------------------------------------------------------------------------

#[given("a Diesel-backed user repository")]
fn a_diesel_backed_user_repository(_world: SharedContext) {}

#[when("the repository creates the account")]
fn the_repository_creates_the_account(world: SharedContext, account: UserAccount) {
    with_context_async(
        &world,
        |_| account,
        |repo, account| async move { repo.create(&account).await },
        |ctx, result| ctx.last_create_error = result.err(),
    );
}

#[when("the repository fetches the account by email")]
fn the_repository_fetches_the_account_by_email(world: SharedContext, email: EmailAddress) {
    with_context_async(
        &world,
        |_| email,
        |repo, email| async move { repo.find_by_email(&email).await },
        |ctx, result| ctx.last_email_result = Some(result),
    );
}

#[when("the repository fetches the user by id")]
fn the_repository_fetches_the_user_by_id(world: SharedContext, id: UserId) {
    with_context_async(
        &world,
        |_| id,
        |repo, id| async move { repo.find_by_id(&id).await },
        |ctx, result| ctx.last_fetch_result = Some(result),
    );
}

#[when("the users table is dropped")]
fn the_users_table_is_dropped(world: SharedContext) {
    let url = {
        let ctx = world.lock().expect("context lock");
        ctx.database_url.clone()
    };
    execute_sql(&url, "DROP TABLE users CASCADE;").expect("drop succeeds");
}

#[then("the stored user is returned")]
fn the_stored_user_is_returned(world: SharedContext, expected: User) {
    let ctx = world.lock().expect("context lock");
    let result = ctx.last_fetch_result.as_ref().expect("fetch was executed");
    match result {
        Ok(Some(user)) => assert_eq!(user, &expected),
        Ok(None) => panic!(
            "expected user but got None; last_create_error: {:?}",
            ctx.last_create_error
        ),
        Err(err) => panic!("expected user but got error: {err}"),
    }
}

#[then("persistence fails with a query error")]
fn persistence_fails_with_a_query_error(world: SharedContext) {
    let ctx = world.lock().expect("context lock");
    assert!(
        matches!(
            ctx.last_create_error,
            Some(UserPersistenceError::Query { .. })
        ),
        "expected Query error, got: {:?}",
        ctx.last_create_error
    );
}

#[then("creation fails with a duplicate email")]
fn creation_fails_with_a_duplicate_email(world: SharedContext) {
    let ctx = world.lock().expect("context lock");
    assert!(
        matches!(
            ctx.last_create_error,
            Some(UserPersistenceError::DuplicateEmail)
        ),
        "expected DuplicateEmail, got: {:?}",
        ctx.last_create_error
    );
}

// -----------------------------------------------------------------------------
// Tests
// -----------------------------------------------------------------------------

#[rstest]
fn created_account_can_be_fetched_by_id(
    diesel_world: Option<SharedContext>,
    staff_account: UserAccount,
) {
    let Some(world) = diesel_world else {
        eprintln!("SKIP-TEST-CLUSTER: created_account_can_be_fetched_by_id skipped");
        return;
    };

    a_diesel_backed_user_repository(world.clone());
    the_repository_creates_the_account(world.clone(), staff_account.clone());
    the_repository_fetches_the_user_by_id(world.clone(), staff_account.user().id().clone());
    the_stored_user_is_returned(world, staff_account.into_user());
}

#[rstest]
fn account_lookup_by_email_returns_a_verifiable_digest(
    diesel_world: Option<SharedContext>,
    staff_account: UserAccount,
) {
    let Some(world) = diesel_world else {
        eprintln!(
            "SKIP-TEST-CLUSTER: account_lookup_by_email_returns_a_verifiable_digest skipped"
        );
        return;
    };

    the_repository_creates_the_account(world.clone(), staff_account.clone());
    the_repository_fetches_the_account_by_email(
        world.clone(),
        staff_account.user().email().clone(),
    );

    let ctx = world.lock().expect("context lock");
    let found = match ctx.last_email_result.as_ref().expect("lookup was executed") {
        Ok(Some(account)) => account,
        other => panic!("expected stored account, got {other:?}"),
    };
    assert_eq!(found.user(), staff_account.user());
    assert!(found.password_digest().verify(STAFF_PASSWORD));
    assert!(!found.password_digest().verify("password124"));
}

#[rstest]
fn stored_hash_is_not_the_plaintext(
    diesel_world: Option<SharedContext>,
    staff_account: UserAccount,
) {
    let Some(world) = diesel_world else {
        eprintln!("SKIP-TEST-CLUSTER: stored_hash_is_not_the_plaintext skipped");
        return;
    };

    the_repository_creates_the_account(world.clone(), staff_account);
    let url = {
        let ctx = world.lock().expect("context lock");
        ctx.database_url.clone()
    };
    let hashes = stored_password_hashes(&url).expect("read hashes");
    assert_eq!(hashes.len(), 1);
    for hash in hashes {
        assert_ne!(hash, STAFF_PASSWORD);
        assert!(hash.starts_with("$argon2id$"), "unexpected hash format: {hash}");
    }
}

#[rstest]
fn duplicate_email_is_refused(diesel_world: Option<SharedContext>, staff_account: UserAccount) {
    let Some(world) = diesel_world else {
        eprintln!("SKIP-TEST-CLUSTER: duplicate_email_is_refused skipped");
        return;
    };

    the_repository_creates_the_account(world.clone(), staff_account.clone());
    {
        let ctx = world.lock().expect("context lock");
        assert!(ctx.last_create_error.is_none(), "first insert succeeds");
    }
    the_repository_creates_the_account(world.clone(), account_for("jane@example.com"));
    creation_fails_with_a_duplicate_email(world.clone());

    the_repository_fetches_the_user_by_id(world.clone(), staff_account.user().id().clone());
    the_stored_user_is_returned(world, staff_account.into_user());
}

#[rstest]
fn unknown_email_is_absent(diesel_world: Option<SharedContext>) {
    let Some(world) = diesel_world else {
        eprintln!("SKIP-TEST-CLUSTER: unknown_email_is_absent skipped");
        return;
    };

    let email = EmailAddress::new("nobody@example.com").expect("valid email");
    the_repository_fetches_the_account_by_email(world.clone(), email);

    let ctx = world.lock().expect("context lock");
    let result = ctx.last_email_result.as_ref().expect("lookup was executed");
    assert!(matches!(result, Ok(None)), "got {result:?}");
}

#[rstest]
fn unknown_user_is_absent(diesel_world: Option<SharedContext>) {
    let Some(world) = diesel_world else {
        eprintln!("SKIP-TEST-CLUSTER: unknown_user_is_absent skipped");
        return;
    };

    let unknown = UserId::new("99999999-9999-9999-9999-999999999999").expect("valid UUID");
    the_repository_fetches_the_user_by_id(world.clone(), unknown);

    let ctx = world.lock().expect("context lock");
    let result = ctx.last_fetch_result.as_ref().expect("fetch was executed");
    assert!(matches!(result, Ok(None)), "got {result:?}");
}

#[rstest]
fn lost_schema_is_a_query_error(diesel_world: Option<SharedContext>, staff_account: UserAccount) {
    let Some(world) = diesel_world else {
        eprintln!("SKIP-TEST-CLUSTER: lost_schema_is_a_query_error skipped");
        return;
    };

    a_diesel_backed_user_repository(world.clone());
    the_users_table_is_dropped(world.clone());
    the_repository_creates_the_account(world.clone(), staff_account);
    persistence_fails_with_a_query_error(world);
}
