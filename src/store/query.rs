//! Read-side aggregation: venues grouped by locality, name search, and
//! detail views with their shows split into past and upcoming.

use chrono::NaiveDateTime;
use diesel::prelude::*;
use diesel::sqlite::SqliteConnection;

use super::action::Actions;
use super::model::*;
use super::Id;
use crate::schema::{artists, shows, venues};

pub fn partition<T: Scheduled>(shows: impl IntoIterator<Item = T>, now: NaiveDateTime) -> Buckets<T> {
    let mut buckets = Buckets::default();

    for show in shows {
        if show.start_time() >= now {
            buckets.upcoming.push(show);
        } else {
            buckets.past.push(show);
        }
    }

    buckets
}

fn upcoming_at_venue(conn: &mut SqliteConnection, venue: Id, now: NaiveDateTime) -> QueryResult<i64> {
    shows::table
        .filter(shows::venue_id.eq(venue))
        .filter(shows::start_time.gt(now))
        .count()
        .get_result(conn)
}

fn upcoming_for_artist(conn: &mut SqliteConnection, artist: Id, now: NaiveDateTime) -> QueryResult<i64> {
    shows::table
        .filter(shows::artist_id.eq(artist))
        .filter(shows::start_time.gt(now))
        .count()
        .get_result(conn)
}

pub fn venues_by_locality(conn: &mut SqliteConnection, now: NaiveDateTime) -> QueryResult<Vec<Locality>> {
    let places: Vec<(String, String)> = venues::table
        .select((venues::city, venues::state))
        .distinct()
        .load(conn)?;

    let mut localities = Vec::with_capacity(places.len());

    for (city, state) in places {
        let in_place: Vec<(Id, String)> = venues::table
            .filter(venues::city.eq(&city))
            .filter(venues::state.eq(&state))
            .order(venues::id.asc())
            .select((venues::id, venues::name))
            .load(conn)?;

        let mut summaries = Vec::with_capacity(in_place.len());
        for (id, name) in in_place {
            summaries.push(Summary {
                id,
                name,
                num_upcoming_shows: upcoming_at_venue(conn, id, now)?,
            });
        }

        localities.push(Locality {
            city,
            state,
            venues: summaries,
        });
    }

    Ok(localities)
}

/// Keeps the rows whose name contains `term`, ignoring case. Folding happens
/// here rather than in SQLite, whose `LIKE` only folds ASCII.
fn matching(rows: Vec<(Id, String)>, term: &str) -> Vec<(Id, String)> {
    let needle = term.to_lowercase();

    rows.into_iter()
        .filter(|(_, name)| name.to_lowercase().contains(&needle))
        .collect()
}

/// Case-insensitive substring search on venue names. The empty term matches
/// every venue.
pub fn search_venues(conn: &mut SqliteConnection, term: &str, now: NaiveDateTime) -> QueryResult<SearchResults> {
    let names: Vec<(Id, String)> = venues::table
        .order(venues::id.asc())
        .select((venues::id, venues::name))
        .load(conn)?;

    let data = matching(names, term)
        .into_iter()
        .map(|(id, name)| {
            Ok(Summary {
                id,
                name,
                num_upcoming_shows: upcoming_at_venue(conn, id, now)?,
            })
        })
        .collect::<QueryResult<Vec<_>>>()?;

    Ok(SearchResults {
        count: data.len(),
        data,
    })
}

/// Case-insensitive substring search on artist names.
pub fn search_artists(conn: &mut SqliteConnection, term: &str, now: NaiveDateTime) -> QueryResult<SearchResults> {
    let names: Vec<(Id, String)> = artists::table
        .order(artists::id.asc())
        .select((artists::id, artists::name))
        .load(conn)?;

    let data = matching(names, term)
        .into_iter()
        .map(|(id, name)| {
            Ok(Summary {
                id,
                name,
                num_upcoming_shows: upcoming_for_artist(conn, id, now)?,
            })
        })
        .collect::<QueryResult<Vec<_>>>()?;

    Ok(SearchResults {
        count: data.len(),
        data,
    })
}

pub fn venue_with_shows(conn: &mut SqliteConnection, id: Id, now: NaiveDateTime) -> QueryResult<VenueWithShows> {
    let venue: Venue = Actions::<Venue>::read(conn, id)?;

    let shows: Vec<ArtistShow> = shows::table
        .inner_join(artists::table)
        .filter(shows::venue_id.eq(id))
        .order((shows::start_time.asc(), shows::id.asc()))
        .select((artists::id, artists::name, artists::image_link, shows::start_time))
        .load(conn)?;

    let Buckets { past, upcoming } = partition(shows, now);

    Ok(VenueWithShows {
        venue,
        past_shows_count: past.len(),
        past_shows: past,
        upcoming_shows_count: upcoming.len(),
        upcoming_shows: upcoming,
    })
}

pub fn artist_with_shows(conn: &mut SqliteConnection, id: Id, now: NaiveDateTime) -> QueryResult<ArtistWithShows> {
    let artist: Artist = Actions::<Artist>::read(conn, id)?;

    let shows: Vec<VenueShow> = shows::table
        .inner_join(venues::table)
        .filter(shows::artist_id.eq(id))
        .order((shows::start_time.asc(), shows::id.asc()))
        .select((venues::id, venues::name, venues::image_link, shows::start_time))
        .load(conn)?;

    let Buckets { past, upcoming } = partition(shows, now);

    Ok(ArtistWithShows {
        artist,
        past_shows_count: past.len(),
        past_shows: past,
        upcoming_shows_count: upcoming.len(),
        upcoming_shows: upcoming,
    })
}

pub fn artist_entries(conn: &mut SqliteConnection) -> QueryResult<Vec<ArtistEntry>> {
    artists::table
        .order(artists::id.asc())
        .select((artists::id, artists::name))
        .load(conn)
}

pub fn show_listings(conn: &mut SqliteConnection) -> QueryResult<Vec<ShowListing>> {
    shows::table
        .inner_join(venues::table)
        .inner_join(artists::table)
        .order((shows::start_time.asc(), shows::id.asc()))
        .select((
            venues::id,
            venues::name,
            artists::id,
            artists::name,
            artists::image_link,
            shows::start_time,
        ))
        .load(conn)
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use chrono::{Duration, NaiveDate};

    use super::*;
    use crate::store::action::create_show;
    use crate::store::db::{open_in_memory, Genres};

    fn now() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 6, 1)
            .and_then(|d| d.and_hms_opt(20, 0, 0))
            .unwrap()
    }

    fn venue(conn: &mut SqliteConnection, name: &str, city: &str, state: &str) -> Venue {
        conn.create(NewVenue {
            name: name.into(),
            city: city.into(),
            state: state.into(),
            address: "1 Main Street".into(),
            genres: Genres::parse("Jazz"),
            ..NewVenue::default()
        })
        .unwrap()
    }

    fn artist(conn: &mut SqliteConnection, name: &str) -> Artist {
        conn.create(NewArtist {
            name: name.into(),
            city: "San Francisco".into(),
            state: "CA".into(),
            ..NewArtist::default()
        })
        .unwrap()
    }

    fn book(conn: &mut SqliteConnection, venue: &Venue, artist: &Artist, start_time: NaiveDateTime) {
        create_show(conn, NewShow { start_time, venue_id: venue.id, artist_id: artist.id }).unwrap();
    }

    #[test]
    fn partition_puts_now_into_upcoming() {
        let at = |offset: i64| VenueShow {
            venue_id: 1,
            venue_name: "Hop".into(),
            venue_image_link: None,
            start_time: now() + Duration::minutes(offset),
        };

        let buckets = partition(vec![at(-1), at(0), at(1)], now());

        assert_eq!(buckets.past, vec![at(-1)]);
        assert_eq!(buckets.upcoming, vec![at(0), at(1)]);
    }

    #[test]
    fn grouping_covers_every_venue_exactly_once() {
        let mut conn = open_in_memory();
        let created = vec![
            venue(&mut conn, "The Musical Hop", "San Francisco", "CA"),
            venue(&mut conn, "The Dueling Pianos Bar", "New York", "NY"),
            venue(&mut conn, "Park Square Live Music & Coffee", "San Francisco", "CA"),
            venue(&mut conn, "Springfield Hall", "Springfield", "IL"),
            venue(&mut conn, "Springfield Arena", "Springfield", "MO"),
        ];

        let localities = venues_by_locality(&mut conn, now()).unwrap();

        let flattened: Vec<Id> = localities
            .iter()
            .flat_map(|l| l.venues.iter().map(|v| v.id))
            .collect();
        let unique: HashSet<Id> = flattened.iter().copied().collect();
        let expected: HashSet<Id> = created.iter().map(|v| v.id).collect();

        assert_eq!(flattened.len(), created.len());
        assert_eq!(unique, expected);
        assert_eq!(localities.len(), 4);

        let san_francisco = localities
            .iter()
            .find(|l| l.city == "San Francisco" && l.state == "CA")
            .unwrap();
        assert_eq!(san_francisco.venues.len(), 2);
    }

    #[test]
    fn upcoming_counts_are_strictly_after_now() {
        let mut conn = open_in_memory();
        let hop = venue(&mut conn, "The Musical Hop", "San Francisco", "CA");
        let band = artist(&mut conn, "Guns N Petals");
        book(&mut conn, &hop, &band, now() - Duration::days(3));
        book(&mut conn, &hop, &band, now() + Duration::days(3));
        book(&mut conn, &hop, &band, now() + Duration::days(10));

        let localities = venues_by_locality(&mut conn, now()).unwrap();

        assert_eq!(localities[0].venues[0].num_upcoming_shows, 2);
    }

    #[test]
    fn venue_search_is_case_insensitive_substring() {
        let mut conn = open_in_memory();
        let hop = venue(&mut conn, "The Musical Hop", "San Francisco", "CA");
        venue(&mut conn, "The Dueling Pianos Bar", "New York", "NY");

        for term in ["Hop", "hop", "MUSICAL h"] {
            let results = search_venues(&mut conn, term, now()).unwrap();
            assert_eq!(results.count, 1, "term {:?}", term);
            assert_eq!(results.data[0].id, hop.id);
        }
    }

    #[test]
    fn search_folds_non_ascii_case() {
        let mut conn = open_in_memory();
        let cafe = venue(&mut conn, "Café Überlin", "Berlin", "BE");
        venue(&mut conn, "The Musical Hop", "San Francisco", "CA");
        let band = artist(&mut conn, "Ødegaard Ensemble");

        for term in ["über", "ÜBER", "CAFÉ", "é ü"] {
            let results = search_venues(&mut conn, term, now()).unwrap();
            assert_eq!(results.count, 1, "term {:?}", term);
            assert_eq!(results.data[0].id, cafe.id);
        }

        let results = search_artists(&mut conn, "øDEGAARD", now()).unwrap();
        assert_eq!(results.data, vec![Summary { id: band.id, name: band.name, num_upcoming_shows: 0 }]);
    }

    #[test]
    fn empty_search_matches_everything() {
        let mut conn = open_in_memory();
        venue(&mut conn, "The Musical Hop", "San Francisco", "CA");
        venue(&mut conn, "The Dueling Pianos Bar", "New York", "NY");
        artist(&mut conn, "Guns N Petals");

        assert_eq!(search_venues(&mut conn, "", now()).unwrap().count, 2);
        assert_eq!(search_artists(&mut conn, "", now()).unwrap().count, 1);
    }

    #[test]
    fn artist_search_reports_upcoming_shows() {
        let mut conn = open_in_memory();
        let hop = venue(&mut conn, "The Musical Hop", "San Francisco", "CA");
        let band = artist(&mut conn, "The Wild Sax Band");
        artist(&mut conn, "Matt Quevedo");
        book(&mut conn, &hop, &band, now() + Duration::days(1));

        let results = search_artists(&mut conn, "band", now()).unwrap();

        assert_eq!(results.count, 1);
        assert_eq!(
            results.data,
            vec![Summary { id: band.id, name: band.name.clone(), num_upcoming_shows: 1 }]
        );
    }

    #[test]
    fn venue_detail_buckets_match_counts() {
        let mut conn = open_in_memory();
        let hop = venue(&mut conn, "The Musical Hop", "San Francisco", "CA");
        let band = artist(&mut conn, "Guns N Petals");
        book(&mut conn, &hop, &band, now() - Duration::days(30));
        book(&mut conn, &hop, &band, now());
        book(&mut conn, &hop, &band, now() + Duration::days(30));

        let detail = venue_with_shows(&mut conn, hop.id, now()).unwrap();

        assert_eq!(detail.venue, hop);
        assert_eq!(detail.past_shows_count, detail.past_shows.len());
        assert_eq!(detail.upcoming_shows_count, detail.upcoming_shows.len());
        assert_eq!(detail.past_shows_count, 1);
        assert_eq!(detail.upcoming_shows_count, 2);
        assert_eq!(detail.upcoming_shows[0].artist_name, "Guns N Petals");
    }

    #[test]
    fn artist_detail_joins_venue_fields() {
        let mut conn = open_in_memory();
        let hop = venue(&mut conn, "The Musical Hop", "San Francisco", "CA");
        let band = artist(&mut conn, "Guns N Petals");
        book(&mut conn, &hop, &band, now() - Duration::days(1));

        let detail = artist_with_shows(&mut conn, band.id, now()).unwrap();

        assert_eq!(detail.upcoming_shows_count, 0);
        assert_eq!(detail.past_shows[0].venue_id, hop.id);
        assert_eq!(detail.past_shows[0].venue_name, "The Musical Hop");
    }

    #[test]
    fn detail_of_missing_entity_is_not_found() {
        let mut conn = open_in_memory();

        assert!(matches!(
            venue_with_shows(&mut conn, 999999, now()),
            Err(diesel::result::Error::NotFound)
        ));
        assert!(matches!(
            artist_with_shows(&mut conn, 999999, now()),
            Err(diesel::result::Error::NotFound)
        ));
    }

    #[test]
    fn show_listing_is_denormalized() {
        let mut conn = open_in_memory();
        let hop = venue(&mut conn, "The Musical Hop", "San Francisco", "CA");
        let band = artist(&mut conn, "Guns N Petals");
        let sax = artist(&mut conn, "The Wild Sax Band");
        book(&mut conn, &hop, &sax, now() + Duration::days(2));
        book(&mut conn, &hop, &band, now() - Duration::days(2));

        let listings = show_listings(&mut conn).unwrap();

        assert_eq!(listings.len(), 2);
        assert_eq!(listings[0].artist_name, "Guns N Petals");
        assert_eq!(listings[0].venue_name, "The Musical Hop");
        assert_eq!(listings[1].artist_id, sax.id);
    }

    #[test]
    fn artist_entries_are_id_and_name() {
        let mut conn = open_in_memory();
        let band = artist(&mut conn, "Guns N Petals");

        assert_eq!(
            artist_entries(&mut conn).unwrap(),
            vec![ArtistEntry { id: band.id, name: band.name }]
        );
    }
}
