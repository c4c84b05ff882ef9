//! In-process adapters for running without PostgreSQL.

mod lead_repository;
mod user_repository;

pub use lead_repository::{InMemoryLeadClaimTransaction, InMemoryLeadRepository};
pub use user_repository::InMemoryUserRepository;
