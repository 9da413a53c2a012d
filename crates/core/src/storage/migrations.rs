//! Database migration system
//!
//! Tracks schema versions and applies migrations in order.

use rusqlite::Connection;
use tracing::{info, instrument};

use crate::error::Result;

/// A database migration
pub struct Migration {
    /// Version number (must be sequential starting from 1)
    pub version: u32,
    /// Description of what this migration does
    pub description: &'static str,
    /// SQL to run for this migration
    pub sql: &'static str,
}

/// All migrations in order
const MIGRATIONS: &[Migration] = &[
    Migration {
        version: 1,
        description: "Initial schema",
        sql: r#"
            -- Events table
            CREATE TABLE IF NOT EXISTS events (
                id TEXT PRIMARY KEY,
                host_id TEXT NOT NULL,
                host_name TEXT NOT NULL,
                event_type TEXT NOT NULL,
                title TEXT NOT NULL,
                date_time TEXT NOT NULL,
                location TEXT,
                expected_guests INTEGER NOT NULL DEFAULT 0,
                dietary_requirements TEXT NOT NULL DEFAULT '[]',
                vibe TEXT,
                decider_id TEXT,
                menu_selected TEXT,
                status TEXT NOT NULL,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
            );

            -- Guests table
            CREATE TABLE IF NOT EXISTS guests (
                id TEXT PRIMARY KEY,
                event_id TEXT NOT NULL,
                name TEXT NOT NULL,
                user_id TEXT,
                email TEXT,
                phone TEXT,
                rsvp TEXT NOT NULL DEFAULT 'invited',
                dietary_requirements TEXT NOT NULL DEFAULT '[]',
                created_at TEXT NOT NULL,
                FOREIGN KEY (event_id) REFERENCES events(id) ON DELETE CASCADE
            );

            -- Votes table
            CREATE TABLE IF NOT EXISTS votes (
                id TEXT PRIMARY KEY,
                event_id TEXT NOT NULL,
                voter_id TEXT NOT NULL,
                voter_name TEXT NOT NULL,
                category TEXT NOT NULL,
                value TEXT NOT NULL,
                created_at TEXT NOT NULL,
                FOREIGN KEY (event_id) REFERENCES events(id) ON DELETE CASCADE
            );

            -- Dishes table
            CREATE TABLE IF NOT EXISTS dishes (
                id TEXT PRIMARY KEY,
                event_id TEXT NOT NULL,
                category TEXT NOT NULL,
                name TEXT NOT NULL,
                recipe_id TEXT,
                assigned_to TEXT,
                assigned_name TEXT,
                status TEXT NOT NULL DEFAULT 'open',
                created_at TEXT NOT NULL,
                FOREIGN KEY (event_id) REFERENCES events(id) ON DELETE CASCADE
            );

            -- Roles table
            CREATE TABLE IF NOT EXISTS roles (
                id TEXT PRIMARY KEY,
                event_id TEXT NOT NULL,
                person_name TEXT NOT NULL,
                role_name TEXT NOT NULL,
                tasks TEXT NOT NULL DEFAULT '[]',
                created_at TEXT NOT NULL,
                FOREIGN KEY (event_id) REFERENCES events(id) ON DELETE CASCADE
            );
        "#,
    },
    Migration {
        version: 2,
        description: "Add indexes for event-scoped lookups",
        sql: r#"
            CREATE INDEX IF NOT EXISTS idx_events_host ON events(host_id);
            CREATE INDEX IF NOT EXISTS idx_guests_event ON guests(event_id);
            CREATE INDEX IF NOT EXISTS idx_guests_user ON guests(user_id);
            CREATE INDEX IF NOT EXISTS idx_votes_event ON votes(event_id);
            CREATE INDEX IF NOT EXISTS idx_votes_event_category ON votes(event_id, category);
            CREATE INDEX IF NOT EXISTS idx_dishes_event ON dishes(event_id);
            CREATE INDEX IF NOT EXISTS idx_roles_event ON roles(event_id);
        "#,
    },
];

/// Create the migrations tracking table
fn init_migrations_table(conn: &Connection) -> Result<()> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS schema_migrations (
            version INTEGER PRIMARY KEY,
            description TEXT NOT NULL,
            applied_at TEXT NOT NULL
        )",
        [],
    )?;
    Ok(())
}

/// Get the current schema version
fn get_current_version(conn: &Connection) -> Result<u32> {
    let version: Option<u32> = conn
        .query_row("SELECT MAX(version) FROM schema_migrations", [], |row| {
            row.get(0)
        })
        .unwrap_or(None);
    Ok(version.unwrap_or(0))
}

/// Record that a migration was applied
fn record_migration(conn: &Connection, migration: &Migration) -> Result<()> {
    conn.execute(
        "INSERT INTO schema_migrations (version, description, applied_at) VALUES (?1, ?2, ?3)",
        rusqlite::params![
            migration.version,
            migration.description,
            chrono::Utc::now().to_rfc3339()
        ],
    )?;
    Ok(())
}

/// Run all pending migrations
#[instrument(skip(conn))]
pub fn run_migrations(conn: &Connection) -> Result<()> {
    init_migrations_table(conn)?;

    let current_version = get_current_version(conn)?;
    info!(current_version, "Checking for pending migrations");

    for migration in MIGRATIONS {
        if migration.version > current_version {
            info!(
                version = migration.version,
                description = migration.description,
                "Applying migration"
            );

            conn.execute_batch(migration.sql)?;
            record_migration(conn, migration)?;
        }
    }

    let new_version = get_current_version(conn)?;
    if new_version > current_version {
        info!(
            from = current_version,
            to = new_version,
            "Database schema updated"
        );
    }

    Ok(())
}
