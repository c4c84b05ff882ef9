//! Internal Diesel row structs for database operations.
//!
//! These types are implementation details of the persistence layer and must
//! never be exposed to the domain.

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use crate::domain::{Lead, LeadIntegrityError, LeadRecord, UserId};

use super::schema::{leads, users};

/// Row struct for reading from the users table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct UserRow {
    pub id: Uuid,
    pub display_name: String,
    pub email: String,
}

/// Row struct for login lookups, digest included.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct UserAccountRow {
    pub id: Uuid,
    pub display_name: String,
    pub email: String,
    pub password_hash: String,
}

/// Insertable struct for creating new user records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = users)]
pub(crate) struct NewUserRow<'a> {
    pub id: Uuid,
    pub display_name: &'a str,
    pub email: &'a str,
    pub password_hash: &'a str,
}

/// Row struct for reading from the leads table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = leads)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct LeadRow {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub course_interest: String,
    pub message: Option<String>,
    pub claimed_by: Option<Uuid>,
    pub is_public: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<LeadRow> for Lead {
    type Error = LeadIntegrityError;

    fn try_from(row: LeadRow) -> Result<Self, Self::Error> {
        Self::try_from(LeadRecord {
            id: row.id,
            name: row.name,
            email: row.email,
            course_interest: row.course_interest,
            message: row.message,
            claimed_by: row.claimed_by.map(UserId::from_uuid),
            is_public: row.is_public,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

/// Insertable struct for new leads; the store assigns the remaining columns.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = leads)]
pub(crate) struct NewLeadRow<'a> {
    pub name: &'a str,
    pub email: &'a str,
    pub course_interest: &'a str,
    pub message: Option<&'a str>,
}

/// Changeset applied by a successful claim.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = leads)]
pub(crate) struct LeadClaimUpdate {
    pub claimed_by: Uuid,
    pub is_public: bool,
    pub updated_at: DateTime<Utc>,
}
