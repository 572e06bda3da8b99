//! Schema definitions and migration runner for SurrealDB.
//!
//! All table definitions use SCHEMAFULL mode for data integrity.
//! UUIDs are stored as strings. Enums are stored as strings with
//! ASSERT constraints for validation. Derived geography points are
//! stored both as a `geometry<point>` column (used inside
//! `geo::distance` predicates) and as scalar longitude/latitude
//! columns that are read back into the domain model; all three are
//! always written in the same statement.

use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use tracing::info;

use crate::error::DbError;

// -----------------------------------------------------------------------
// Migration tracking
// -----------------------------------------------------------------------

const MIGRATION_TABLE_DDL: &str = "\
DEFINE TABLE IF NOT EXISTS _migration SCHEMAFULL;
DEFINE FIELD IF NOT EXISTS version ON TABLE _migration TYPE int;
DEFINE FIELD IF NOT EXISTS name ON TABLE _migration TYPE string;
DEFINE FIELD IF NOT EXISTS applied_at ON TABLE _migration TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX IF NOT EXISTS idx_migration_version ON TABLE _migration \
    COLUMNS version UNIQUE;
";

#[derive(Debug, SurrealValue)]
struct MigrationRecord {
    version: u32,
    #[allow(dead_code)]
    name: String,
}

struct Migration {
    version: u32,
    name: &'static str,
    sql: &'static str,
}

static MIGRATIONS: &[Migration] = &[Migration {
    version: 1,
    name: "initial_schema",
    sql: SCHEMA_V1,
}];

// -----------------------------------------------------------------------
// Schema v1 — initial table definitions
// -----------------------------------------------------------------------

const SCHEMA_V1: &str = "\
-- =======================================================================
-- Users
-- =======================================================================
DEFINE TABLE user SCHEMAFULL;
DEFINE FIELD email ON TABLE user TYPE option<string>;
DEFINE FIELD phone ON TABLE user TYPE option<string>;
DEFINE FIELD username ON TABLE user TYPE option<string>;
DEFINE FIELD password_hash ON TABLE user TYPE string;
DEFINE FIELD full_name ON TABLE user TYPE option<string>;
DEFINE FIELD bio ON TABLE user TYPE option<string>;
DEFINE FIELD birthday ON TABLE user TYPE option<datetime>;
DEFINE FIELD gender ON TABLE user TYPE option<string>;
DEFINE FIELD marital_status ON TABLE user TYPE option<string>;
DEFINE FIELD address ON TABLE user TYPE option<string>;
DEFINE FIELD job_title ON TABLE user TYPE option<string>;
DEFINE FIELD avatar_url ON TABLE user TYPE option<string>;
DEFINE FIELD social_links ON TABLE user TYPE object FLEXIBLE DEFAULT {};
DEFINE FIELD role ON TABLE user TYPE string \
    ASSERT $value IN ['user', 'organizer', 'admin', 'super-admin'];
DEFINE FIELD notification_radius ON TABLE user TYPE int DEFAULT 5;
DEFINE FIELD home_church ON TABLE user TYPE option<string>;
DEFINE FIELD church_role ON TABLE user TYPE option<string>;
DEFINE FIELD membership_date ON TABLE user TYPE option<datetime>;
DEFINE FIELD created_at ON TABLE user TYPE datetime \
    DEFAULT time::now();
DEFINE FIELD updated_at ON TABLE user TYPE datetime \
    DEFAULT time::now();
DEFINE FIELD deleted_at ON TABLE user TYPE option<datetime>;
DEFINE INDEX idx_user_home_church ON TABLE user COLUMNS home_church;

-- =======================================================================
-- Organizations
-- =======================================================================
DEFINE TABLE organization SCHEMAFULL;
DEFINE FIELD name ON TABLE organization TYPE string;
DEFINE FIELD description ON TABLE organization TYPE option<string>;
DEFINE FIELD website ON TABLE organization TYPE option<string>;
DEFINE FIELD address ON TABLE organization TYPE option<string>;
DEFINE FIELD latitude ON TABLE organization TYPE option<float>;
DEFINE FIELD longitude ON TABLE organization TYPE option<float>;
DEFINE FIELD location ON TABLE organization \
    TYPE option<geometry<point>>;
DEFINE FIELD location_lng ON TABLE organization TYPE option<float>;
DEFINE FIELD location_lat ON TABLE organization TYPE option<float>;
DEFINE FIELD logo_url ON TABLE organization TYPE option<string>;
DEFINE FIELD is_verified ON TABLE organization TYPE bool DEFAULT false;
DEFINE FIELD owner_id ON TABLE organization TYPE string;
DEFINE FIELD created_at ON TABLE organization TYPE datetime \
    DEFAULT time::now();
DEFINE FIELD updated_at ON TABLE organization TYPE datetime \
    DEFAULT time::now();
DEFINE FIELD deleted_at ON TABLE organization TYPE option<datetime>;
DEFINE INDEX idx_organization_owner ON TABLE organization \
    COLUMNS owner_id;

-- =======================================================================
-- Events
-- =======================================================================
DEFINE TABLE event SCHEMAFULL;
DEFINE FIELD title ON TABLE event TYPE string;
DEFINE FIELD description ON TABLE event TYPE option<string>;
DEFINE FIELD kind ON TABLE event TYPE string;
DEFINE FIELD category ON TABLE event TYPE string DEFAULT 'general';
DEFINE FIELD latitude ON TABLE event TYPE float;
DEFINE FIELD longitude ON TABLE event TYPE float;
DEFINE FIELD location ON TABLE event TYPE option<geometry<point>>;
DEFINE FIELD location_lng ON TABLE event TYPE option<float>;
DEFINE FIELD location_lat ON TABLE event TYPE option<float>;
DEFINE FIELD address ON TABLE event TYPE string;
DEFINE FIELD start_datetime ON TABLE event TYPE datetime;
DEFINE FIELD end_datetime ON TABLE event TYPE datetime;
DEFINE FIELD image_url ON TABLE event TYPE option<string>;
DEFINE FIELD organizer_id ON TABLE event TYPE string;
DEFINE FIELD organization_id ON TABLE event TYPE option<string>;
DEFINE FIELD created_at ON TABLE event TYPE datetime \
    DEFAULT time::now();
DEFINE FIELD updated_at ON TABLE event TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX idx_event_start ON TABLE event COLUMNS start_datetime;
DEFINE INDEX idx_event_organizer ON TABLE event COLUMNS organizer_id;

-- =======================================================================
-- Notifications (append-only)
-- =======================================================================
DEFINE TABLE notification SCHEMAFULL;
DEFINE FIELD title ON TABLE notification TYPE string;
DEFINE FIELD message ON TABLE notification TYPE string;
DEFINE FIELD kind ON TABLE notification TYPE string \
    ASSERT $value IN ['event', 'confirmation', 'reminder', 'system'];
DEFINE FIELD is_read ON TABLE notification TYPE bool DEFAULT false;
DEFINE FIELD user_id ON TABLE notification TYPE string;
DEFINE FIELD created_at ON TABLE notification TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX idx_notification_user ON TABLE notification \
    COLUMNS user_id;

-- =======================================================================
-- Graph Edge Tables (relations)
-- =======================================================================

-- User -> Event participation
DEFINE TABLE participates TYPE RELATION SCHEMAFULL;

-- User -> Event favorites
DEFINE TABLE favorites TYPE RELATION SCHEMAFULL;
";

// -----------------------------------------------------------------------
// Public API
// -----------------------------------------------------------------------

/// Run all pending migrations against the given SurrealDB client.
///
/// Creates a `_migration` tracking table on first run, then applies
/// each migration whose version exceeds the current maximum.
/// All DEFINE statements are idempotent so re-running is safe.
pub async fn run_migrations<C: Connection>(db: &Surreal<C>) -> Result<(), DbError> {
    // Ensure migration tracking table exists (idempotent).
    db.query(MIGRATION_TABLE_DDL)
        .await?
        .check()
        .map_err(|e| DbError::Migration(e.to_string()))?;

    // Determine current schema version.
    let mut result = db
        .query("SELECT * FROM _migration ORDER BY version DESC LIMIT 1")
        .await?;
    let records: Vec<MigrationRecord> = result.take(0)?;
    let current_version = records.first().map(|m| m.version).unwrap_or(0);

    for migration in MIGRATIONS {
        if migration.version > current_version {
            info!(
                version = migration.version,
                name = migration.name,
                "Applying migration"
            );
            db.query(migration.sql).await?.check().map_err(|e| {
                DbError::Migration(format!(
                    "Migration v{} '{}' failed: {}",
                    migration.version, migration.name, e,
                ))
            })?;

            // Record the applied migration.
            db.query(
                "CREATE _migration SET version = $version, \
                 name = $name",
            )
            .bind(("version", migration.version))
            .bind(("name", migration.name))
            .await?
            .check()
            .map_err(|e| {
                DbError::Migration(format!(
                    "Failed to record migration v{}: {}",
                    migration.version, e,
                ))
            })?;

            info!(
                version = migration.version,
                "Migration applied successfully"
            );
        }
    }

    Ok(())
}

/// Returns the raw schema DDL for version 1.
///
/// Exposed for testing with in-memory SurrealDB instances that
/// bypass the migration runner.
pub fn schema_v1() -> &'static str {
    SCHEMA_V1
}
