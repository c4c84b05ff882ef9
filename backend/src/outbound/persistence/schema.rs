//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match `backend/migrations` exactly. Regenerate with
//! `diesel print-schema` after changing a migration.

diesel::table! {
    /// Staff users that can own leads.
    users (id) {
        /// Primary key: UUID of the staff account.
        id -> Uuid,
        /// Human-readable display name (max 255 characters).
        display_name -> Varchar,
        /// Login email, lower-cased; unique.
        email -> Varchar,
        /// Argon2id PHC string.
        password_hash -> Text,
        /// Record creation timestamp.
        created_at -> Timestamptz,
        /// Last modification timestamp.
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Visitor enquiries and their claim state.
    ///
    /// `is_public` duplicates `claimed_by IS NULL`; both are written together
    /// by the claim update.
    leads (id) {
        /// Primary key assigned from a `BIGSERIAL` sequence.
        id -> Int8,
        /// Enquirer name.
        name -> Varchar,
        /// Enquirer email, lower-cased.
        email -> Varchar,
        /// Course the enquiry is about.
        course_interest -> Varchar,
        /// Optional free-text message.
        message -> Nullable<Text>,
        /// Owning staff user; `ON DELETE SET NULL`.
        claimed_by -> Nullable<Uuid>,
        /// Visible in the public listing.
        is_public -> Bool,
        /// Submission timestamp.
        created_at -> Timestamptz,
        /// Last state change.
        updated_at -> Timestamptz,
    }
}

diesel::joinable!(leads -> users (claimed_by));
diesel::allow_tables_to_appear_in_same_query!(leads, users);
