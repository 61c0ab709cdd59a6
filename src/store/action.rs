use diesel::dsl::exists;
use diesel::prelude::*;
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use diesel::sqlite::SqliteConnection;

use super::model::{Artist, ArtistChanges, NewArtist, NewShow, NewVenue, Show, Venue, VenueChanges};
use super::Id;
use crate::schema::{artists, shows, venues};

/// Typed CRUD for one kind of record.
///
/// Implemented on the connection itself so that a whole unit of work can be
/// expressed inside a single `Connection::transaction` closure.
pub trait Actions<T> {
    type New;
    type Changes;

    fn all(&mut self) -> QueryResult<Vec<T>>;
    fn create(&mut self, item: Self::New) -> QueryResult<T>;
    fn read(&mut self, id: Id) -> QueryResult<T>;
    /// Applies `changes` and returns the updated record. Fails with
    /// `NotFound` if there is no record with this id.
    fn update(&mut self, id: Id, changes: Self::Changes) -> QueryResult<T>;
    /// Returns the number of deleted rows, zero if the id was unknown.
    fn delete(&mut self, id: Id) -> QueryResult<usize>;
}

macro_rules! derive_actions {
    ($t: ident, $new: ident, $changes: ident, $table: ident) => {
        impl Actions<$t> for SqliteConnection {
            type New = $new;
            type Changes = $changes;

            fn all(&mut self) -> QueryResult<Vec<$t>> {
                $table::table
                    .order($table::id.asc())
                    .select($t::as_select())
                    .load(self)
            }

            fn create(&mut self, item: $new) -> QueryResult<$t> {
                diesel::insert_into($table::table)
                    .values(&item)
                    .returning($t::as_returning())
                    .get_result(self)
            }

            fn read(&mut self, item_id: Id) -> QueryResult<$t> {
                $table::table
                    .find(item_id)
                    .select($t::as_select())
                    .first(self)
            }

            fn update(&mut self, item_id: Id, changes: $changes) -> QueryResult<$t> {
                let previous = <Self as Actions<$t>>::read(self, item_id)?;

                if changes.is_empty() {
                    return Ok(previous);
                }

                diesel::update($table::table.find(item_id))
                    .set(&changes)
                    .returning($t::as_returning())
                    .get_result(self)
            }

            fn delete(&mut self, item_id: Id) -> QueryResult<usize> {
                diesel::delete($table::table.find(item_id)).execute(self)
            }
        }
    };
}

derive_actions!(Venue, NewVenue, VenueChanges, venues);
derive_actions!(Artist, NewArtist, ArtistChanges, artists);

/// Books a show. Both ends must exist; otherwise nothing is written and a
/// foreign key violation is reported.
pub fn create_show(conn: &mut SqliteConnection, show: NewShow) -> QueryResult<Show> {
    let venue_exists: bool =
        diesel::select(exists(venues::table.find(show.venue_id))).get_result(conn)?;
    let artist_exists: bool =
        diesel::select(exists(artists::table.find(show.artist_id))).get_result(conn)?;

    if !venue_exists || !artist_exists {
        let message = format!(
            "show references venue {} and artist {}, which do not both exist",
            show.venue_id, show.artist_id
        );
        return Err(DieselError::DatabaseError(
            DatabaseErrorKind::ForeignKeyViolation,
            Box::new(message),
        ));
    }

    diesel::insert_into(shows::table)
        .values(&show)
        .returning(Show::as_returning())
        .get_result(conn)
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::store::db::{open_in_memory, Genres};

    fn musical_hop() -> NewVenue {
        NewVenue {
            name: "The Musical Hop".into(),
            city: "San Francisco".into(),
            state: "CA".into(),
            address: "1015 Folsom Street".into(),
            phone: Some("123-123-1234".into()),
            genres: Genres::parse("Jazz, Reggae, Swing"),
            seeking_talent: true,
            seeking_description: Some("Looking for a local artist.".into()),
            ..NewVenue::default()
        }
    }

    fn guns_n_petals() -> NewArtist {
        NewArtist {
            name: "Guns N Petals".into(),
            city: "San Francisco".into(),
            state: "CA".into(),
            genres: Genres::parse("Rock n Roll"),
            ..NewArtist::default()
        }
    }

    fn may_21() -> chrono::NaiveDateTime {
        NaiveDate::from_ymd_opt(2019, 5, 21)
            .and_then(|d| d.and_hms_opt(21, 30, 0))
            .unwrap()
    }

    #[test]
    fn create_then_read_venue() {
        let mut conn = open_in_memory();
        let created: Venue = conn.create(musical_hop()).unwrap();
        let read: Venue = conn.read(created.id).unwrap();

        assert_eq!(created, read);
        assert_eq!(read.genres.0, vec!["Jazz", "Reggae", "Swing"]);
        assert!(read.seeking_talent);
    }

    #[test]
    fn empty_update_leaves_row_unchanged() {
        let mut conn = open_in_memory();
        let created: Venue = conn.create(musical_hop()).unwrap();

        let updated: Venue = conn.update(created.id, VenueChanges::default()).unwrap();

        assert_eq!(created, updated);
        assert_eq!(Actions::<Venue>::read(&mut conn, created.id).unwrap(), created);
    }

    #[test]
    fn partial_update_touches_only_given_columns() {
        let mut conn = open_in_memory();
        let created: Venue = conn.create(musical_hop()).unwrap();

        let changes = VenueChanges {
            city: Some("Oakland".into()),
            phone: Some(None),
            ..VenueChanges::default()
        };
        let updated: Venue = conn.update(created.id, changes).unwrap();

        assert_eq!(updated.city, "Oakland");
        assert_eq!(updated.phone, None);
        assert_eq!(updated.name, created.name);
        assert_eq!(updated.genres, created.genres);
    }

    #[test]
    fn update_of_unknown_id_is_not_found() {
        let mut conn = open_in_memory();
        let result = Actions::<Artist>::update(&mut conn, 999999, ArtistChanges::default());

        assert!(matches!(result, Err(DieselError::NotFound)));
    }

    #[test]
    fn deleting_unknown_id_affects_nothing() {
        let mut conn = open_in_memory();
        let deleted = Actions::<Venue>::delete(&mut conn, 999999).unwrap();

        assert_eq!(deleted, 0);
    }

    #[test]
    fn deleting_a_venue_removes_its_shows() {
        let mut conn = open_in_memory();
        let venue: Venue = conn.create(musical_hop()).unwrap();
        let artist: Artist = conn.create(guns_n_petals()).unwrap();
        create_show(&mut conn, NewShow { start_time: may_21(), venue_id: venue.id, artist_id: artist.id }).unwrap();

        assert_eq!(Actions::<Venue>::delete(&mut conn, venue.id).unwrap(), 1);

        let remaining: i64 = shows::table.count().get_result(&mut conn).unwrap();
        assert_eq!(remaining, 0);
    }

    #[test]
    fn show_with_unknown_venue_is_rejected_without_a_row() {
        let mut conn = open_in_memory();
        let artist: Artist = conn.create(guns_n_petals()).unwrap();

        let result = conn.transaction(|conn| {
            create_show(conn, NewShow { start_time: may_21(), venue_id: 999999, artist_id: artist.id })
        });

        assert!(matches!(
            result,
            Err(DieselError::DatabaseError(DatabaseErrorKind::ForeignKeyViolation, _))
        ));
        let count: i64 = shows::table.count().get_result(&mut conn).unwrap();
        assert_eq!(count, 0);
    }

    #[test]
    fn foreign_keys_are_enforced_by_the_schema() {
        let mut conn = open_in_memory();
        let result = diesel::insert_into(shows::table)
            .values(&NewShow { start_time: may_21(), venue_id: 1, artist_id: 1 })
            .execute(&mut conn);

        assert!(result.is_err());
    }
}
