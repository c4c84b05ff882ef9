//! Lead aggregate and its claim state.
//!
//! A lead is created unclaimed and public, then transitions exactly once to
//! claimed-by a staff user, at which point it stops being public. There is no
//! unclaim or deletion.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::UserId;

/// Errors raised when a lead identifier is unusable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum LeadIdError {
    /// Identifiers are assigned from a sequence starting at 1.
    #[error("lead id must be a positive integer, got {0}")]
    NotPositive(i64),
}

/// Store-assigned lead identifier.
///
/// ## Invariants
/// - Strictly positive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub struct LeadId(i64);

impl LeadId {
    /// Validate and wrap a raw identifier.
    ///
    /// # Examples
    /// ```
    /// use backend::domain::LeadId;
    ///
    /// assert_eq!(LeadId::new(7).map(LeadId::get), Ok(7));
    /// assert!(LeadId::new(0).is_err());
    /// ```
    pub fn new(raw: i64) -> Result<Self, LeadIdError> {
        if raw > 0 {
            Ok(Self(raw))
        } else {
            Err(LeadIdError::NotPositive(raw))
        }
    }

    /// Raw identifier value.
    pub fn get(self) -> i64 {
        self.0
    }
}

impl fmt::Display for LeadId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<LeadId> for i64 {
    fn from(value: LeadId) -> Self {
        value.0
    }
}

impl TryFrom<i64> for LeadId {
    type Error = LeadIdError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Reasons a stored row cannot be read back as a [`Lead`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LeadIntegrityError {
    /// Stored identifier is not positive.
    #[error(transparent)]
    Id(#[from] LeadIdError),
    /// A required text column is blank.
    #[error("lead {id} has an empty {field}")]
    EmptyField { id: i64, field: &'static str },
    /// `is_public` disagrees with the presence of an owner.
    #[error("lead {id} has is_public={is_public} but claimed_by present={claimed}")]
    VisibilityMismatch {
        id: i64,
        is_public: bool,
        claimed: bool,
    },
}

/// Raw lead values as held by a storage adapter.
///
/// Adapters fill this from their own row type and convert with
/// [`Lead::try_from`], which rejects corrupt rows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeadRecord {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub course_interest: String,
    pub message: Option<String>,
    pub claimed_by: Option<UserId>,
    pub is_public: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A prospective student's enquiry.
///
/// ## Invariants
/// - `id` is positive.
/// - `name`, `email` and `course_interest` are non-empty.
/// - `is_public == claimed_by.is_none()`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lead {
    id: LeadId,
    name: String,
    email: String,
    course_interest: String,
    message: Option<String>,
    claimed_by: Option<UserId>,
    is_public: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<LeadRecord> for Lead {
    type Error = LeadIntegrityError;

    fn try_from(record: LeadRecord) -> Result<Self, Self::Error> {
        let LeadRecord {
            id,
            name,
            email,
            course_interest,
            message,
            claimed_by,
            is_public,
            created_at,
            updated_at,
        } = record;

        let lead_id = LeadId::new(id)?;
        for (field, value) in [
            ("name", &name),
            ("email", &email),
            ("course_interest", &course_interest),
        ] {
            if value.trim().is_empty() {
                return Err(LeadIntegrityError::EmptyField { id, field });
            }
        }
        if is_public == claimed_by.is_some() {
            return Err(LeadIntegrityError::VisibilityMismatch {
                id,
                is_public,
                claimed: claimed_by.is_some(),
            });
        }

        Ok(Self {
            id: lead_id,
            name,
            email,
            course_interest,
            message,
            claimed_by,
            is_public,
            created_at,
            updated_at,
        })
    }
}

impl Lead {
    /// Store-assigned identifier.
    #[must_use]
    pub fn id(&self) -> LeadId {
        self.id
    }

    /// Enquirer name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Enquirer email, lower-cased at submission.
    #[must_use]
    pub fn email(&self) -> &str {
        &self.email
    }

    /// Course the enquiry is about.
    #[must_use]
    pub fn course_interest(&self) -> &str {
        &self.course_interest
    }

    /// Optional free-text message.
    #[must_use]
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    /// Owning staff user, if claimed.
    #[must_use]
    pub fn claimed_by(&self) -> Option<&UserId> {
        self.claimed_by.as_ref()
    }

    /// Whether the lead appears in the public listing.
    #[must_use]
    pub fn is_public(&self) -> bool {
        self.is_public
    }

    /// Submission time.
    #[must_use]
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Time of the last write.
    #[must_use]
    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Return the claimed form of this lead, or `None` when it already has an
    /// owner.
    ///
    /// Used by adapters that apply the conditional write in process rather
    /// than in SQL.
    pub fn claimed(&self, user: &UserId, at: DateTime<Utc>) -> Option<Self> {
        if self.claimed_by.is_some() {
            return None;
        }
        Some(Self {
            claimed_by: Some(user.clone()),
            is_public: false,
            updated_at: at,
            ..self.clone()
        })
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for lead invariants.
    use super::*;
    use rstest::{fixture, rstest};

    #[fixture]
    fn record() -> LeadRecord {
        let now = Utc::now();
        LeadRecord {
            id: 1,
            name: "Alice Student".to_owned(),
            email: "alice@student.com".to_owned(),
            course_interest: "JavaScript Bootcamp".to_owned(),
            message: None,
            claimed_by: None,
            is_public: true,
            created_at: now,
            updated_at: now,
        }
    }

    #[rstest]
    #[case(0)]
    #[case(-4)]
    fn rejects_non_positive_ids(mut record: LeadRecord, #[case] id: i64) {
        record.id = id;
        let err = Lead::try_from(record).expect_err("non-positive id");
        assert_eq!(err, LeadIntegrityError::Id(LeadIdError::NotPositive(id)));
    }

    #[rstest]
    fn rejects_empty_required_text(mut record: LeadRecord) {
        record.course_interest = " ".to_owned();
        let err = Lead::try_from(record).expect_err("empty course");
        assert_eq!(
            err,
            LeadIntegrityError::EmptyField {
                id: 1,
                field: "course_interest"
            }
        );
    }

    #[rstest]
    #[case(true, true)]
    #[case(false, false)]
    fn rejects_visibility_mismatch(
        mut record: LeadRecord,
        #[case] is_public: bool,
        #[case] claimed: bool,
    ) {
        record.is_public = is_public;
        record.claimed_by = claimed.then(UserId::random);
        assert!(matches!(
            Lead::try_from(record),
            Err(LeadIntegrityError::VisibilityMismatch { .. })
        ));
    }

    #[rstest]
    fn claimed_flips_visibility_and_refreshes_timestamp(record: LeadRecord) {
        let lead = Lead::try_from(record).expect("valid lead");
        let user = UserId::random();
        let later = lead.updated_at() + chrono::Duration::seconds(5);

        let claimed = lead.claimed(&user, later).expect("unclaimed lead");

        assert_eq!(claimed.claimed_by(), Some(&user));
        assert!(!claimed.is_public());
        assert_eq!(claimed.updated_at(), later);
        assert_eq!(claimed.created_at(), lead.created_at());
        assert!(claimed.claimed(&UserId::random(), later).is_none());
    }

    #[rstest]
    fn lead_id_serialises_as_number() {
        let id = LeadId::new(42).expect("positive");
        assert_eq!(serde_json::to_value(id).expect("serialise"), serde_json::json!(42));
        assert!(serde_json::from_value::<LeadId>(serde_json::json!(-1)).is_err());
    }
}
