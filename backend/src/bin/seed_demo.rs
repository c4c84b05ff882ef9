//! Seed demo staff accounts and sample enquiries into PostgreSQL.
//!
//! Applies pending migrations first. Staff accounts that already exist are
//! skipped, and no enquiry is inserted while unclaimed leads exist.

use std::env;
use std::io::{self, Write};
use std::sync::Arc;

use backend::domain::{
    AccountService, LeadQueryService, LeadSubmissionService, seed_demo_leads, seed_staff_accounts,
};
use backend::outbound::persistence::{
    DbPool, DieselLeadRepository, DieselUserRepository, PoolConfig, run_migrations,
};
use clap::Parser;
use tokio::runtime::Builder;

/// `seed-demo` command arguments.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "seed-demo",
    about = "Create demo staff accounts and sample enquiries",
    version
)]
struct CliArgs {
    /// Database connection URL. Falls back to `LEADS_DATABASE_URL`, then
    /// `DATABASE_URL`.
    #[arg(long = "database-url", value_name = "url")]
    database_url: Option<String>,
    /// Skip applying pending migrations.
    #[arg(long = "skip-migrations")]
    skip_migrations: bool,
}

fn main() -> io::Result<()> {
    let runtime = Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|error| io::Error::other(format!("create Tokio runtime: {error}")))?;
    runtime.block_on(async_main())
}

async fn async_main() -> io::Result<()> {
    let args = CliArgs::try_parse().map_err(io::Error::other)?;
    let database_url = resolve_database_url(args.database_url)?;

    if !args.skip_migrations {
        let url = database_url.clone();
        tokio::task::spawn_blocking(move || run_migrations(&url))
            .await
            .map_err(io::Error::other)?
            .map_err(io::Error::other)?;
    }

    let pool = DbPool::new(PoolConfig::new(&database_url).with_max_size(2))
        .await
        .map_err(|error| io::Error::other(format!("create database pool: {error}")))?;

    let accounts = AccountService::new(Arc::new(DieselUserRepository::new(pool.clone())));
    let staff = seed_staff_accounts(&accounts)
        .await
        .map_err(|error| io::Error::other(format!("seed staff accounts: {error}")))?;

    let repo = Arc::new(DieselLeadRepository::new(pool));
    let queries = LeadQueryService::new(Arc::clone(&repo));
    let submissions = LeadSubmissionService::new(repo);
    let leads = seed_demo_leads(&queries, &submissions)
        .await
        .map_err(|error| io::Error::other(format!("seed demo leads: {error}")))?;

    let mut stdout = io::stdout().lock();
    writeln!(stdout, "staff={staff} leads={leads}")
}

fn resolve_database_url(cli_value: Option<String>) -> io::Result<String> {
    cli_value
        .or_else(|| env::var("LEADS_DATABASE_URL").ok())
        .or_else(|| env::var("DATABASE_URL").ok())
        .filter(|url| !url.trim().is_empty())
        .ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::InvalidInput,
                "database URL is required via --database-url, LEADS_DATABASE_URL or DATABASE_URL",
            )
        })
}
