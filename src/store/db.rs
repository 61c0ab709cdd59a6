use std::fmt;

use diesel::backend::Backend;
use diesel::deserialize::{self, FromSql};
use diesel::serialize::{self, IsNull, Output, ToSql};
use diesel::sql_types::Text;
use diesel::sqlite::Sqlite;
use diesel::{AsExpression, FromSqlRow};
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};
use rocket::fairing;
use rocket::{Build, Rocket};
use rocket_sync_db_pools::database;
use serde::{Deserialize, Serialize};

#[database("sqlite_database")]
pub struct Connection(diesel::SqliteConnection);

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

pub async fn initialize(rocket: Rocket<Build>) -> fairing::Result {
    let conn = match Connection::get_one(&rocket).await {
        Some(conn) => conn,
        None => {
            log::error!("Database connection failed.");
            return Err(rocket);
        }
    };

    let migrated = conn
        .run(|conn| {
            conn.run_pending_migrations(MIGRATIONS)
                .map(|applied| applied.len())
                .map_err(|e| e.to_string())
        })
        .await;

    match migrated {
        Ok(0) => Ok(rocket),
        Ok(count) => {
            log::info!("Applied {} database migration(s).", count);
            Ok(rocket)
        }
        Err(e) => {
            log::error!("Failed to run database migrations: {}", e);
            Err(rocket)
        }
    }
}

/// Genre tags of a venue or artist, stored as a JSON array in a text column.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, AsExpression, FromSqlRow)]
#[diesel(sql_type = Text)]
#[serde(transparent)]
pub struct Genres(pub Vec<String>);

impl Genres {
    /// Splits a comma-separated form value into genres, dropping blank entries.
    pub fn parse(input: &str) -> Genres {
        Genres(
            input
                .split(',')
                .map(str::trim)
                .filter(|genre| !genre.is_empty())
                .map(String::from)
                .collect(),
        )
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for Genres {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.join(", "))
    }
}

impl ToSql<Text, Sqlite> for Genres {
    fn to_sql<'b>(&'b self, out: &mut Output<'b, '_, Sqlite>) -> serialize::Result {
        out.set_value(serde_json::to_string(&self.0)?);
        Ok(IsNull::No)
    }
}

impl FromSql<Text, Sqlite> for Genres {
    fn from_sql(value: <Sqlite as Backend>::RawValue<'_>) -> deserialize::Result<Self> {
        let json = <String as FromSql<Text, Sqlite>>::from_sql(value)?;
        Ok(Genres(serde_json::from_str(&json)?))
    }
}

#[cfg(test)]
pub fn open_in_memory() -> diesel::SqliteConnection {
    use diesel::connection::SimpleConnection;
    use diesel::Connection as _;

    let mut conn = diesel::SqliteConnection::establish(":memory:")
        .expect("in-memory database");
    conn.batch_execute("PRAGMA foreign_keys = ON;")
        .expect("enable foreign keys");
    conn.run_pending_migrations(MIGRATIONS)
        .expect("run migrations");
    conn
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn genres_are_split_on_commas() {
        let genres = Genres::parse(" Jazz, Reggae,,Swing ,");
        assert_eq!(genres.0, vec!["Jazz", "Reggae", "Swing"]);
        assert_eq!(genres.to_string(), "Jazz, Reggae, Swing");
    }

    #[test]
    fn blank_genres_are_empty() {
        assert!(Genres::parse("  ").is_empty());
        assert!(Genres::parse("").is_empty());
    }
}
