//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match `backend/migrations` exactly. Regenerate with
//! `diesel print-schema` after changing a migration.

diesel::table! {
    /// Sports events, one row per event.
    ///
    /// Every query filters on `user_id`; the `(user_id, date_time)` and
    /// `(user_id, id)` indexes back listing and point lookups.
    events (id) {
        /// Primary key: UUID v4 assigned on insert.
        id -> Uuid,
        /// Owning identity; never updated.
        user_id -> Uuid,
        /// Trimmed display name.
        name -> Text,
        /// Canonical sport registry id.
        sport_type -> Text,
        /// When the event takes place (UTC).
        date_time -> Timestamptz,
        description -> Nullable<Text>,
        /// Trimmed, non-empty venue names.
        venues -> Array<Text>,
        /// Optional colour tag (`red`, `blue`, ...).
        color -> Nullable<Varchar>,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}
