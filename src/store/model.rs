use chrono::NaiveDateTime;
use diesel::prelude::*;
use serde::{Deserialize, Serialize};

use super::db::Genres;
use super::Id;
use crate::schema::{artists, shows, venues};

#[derive(Queryable, Selectable, Identifiable, Serialize, Deserialize, Debug, Clone, PartialEq)]
#[diesel(table_name = venues)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct Venue {
    pub id: Id,
    pub name: String,
    pub city: String,
    pub state: String,
    pub address: String,
    pub phone: Option<String>,
    pub image_link: Option<String>,
    pub facebook_link: Option<String>,
    pub genres: Genres,
    pub website: Option<String>,
    pub seeking_talent: bool,
    pub seeking_description: Option<String>,
}

#[derive(Insertable, Debug, Clone, Default)]
#[diesel(table_name = venues)]
pub struct NewVenue {
    pub name: String,
    pub city: String,
    pub state: String,
    pub address: String,
    pub phone: Option<String>,
    pub image_link: Option<String>,
    pub facebook_link: Option<String>,
    pub genres: Genres,
    pub website: Option<String>,
    pub seeking_talent: bool,
    pub seeking_description: Option<String>,
}

/// Partial update of a venue. `None` leaves the column untouched, while
/// `Some(None)` clears a nullable column.
#[derive(AsChangeset, Debug, Clone, Default, PartialEq)]
#[diesel(table_name = venues)]
pub struct VenueChanges {
    pub name: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub address: Option<String>,
    pub phone: Option<Option<String>>,
    pub image_link: Option<Option<String>>,
    pub facebook_link: Option<Option<String>>,
    pub genres: Option<Genres>,
    pub website: Option<Option<String>>,
    pub seeking_talent: Option<bool>,
    pub seeking_description: Option<Option<String>>,
}

impl VenueChanges {
    pub fn is_empty(&self) -> bool {
        *self == VenueChanges::default()
    }
}

#[derive(Queryable, Selectable, Identifiable, Serialize, Deserialize, Debug, Clone, PartialEq)]
#[diesel(table_name = artists)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct Artist {
    pub id: Id,
    pub name: String,
    pub city: String,
    pub state: String,
    pub phone: Option<String>,
    pub genres: Genres,
    pub image_link: Option<String>,
    pub facebook_link: Option<String>,
    pub website: Option<String>,
    pub seeking_venue: bool,
    pub seeking_description: Option<String>,
}

#[derive(Insertable, Debug, Clone, Default)]
#[diesel(table_name = artists)]
pub struct NewArtist {
    pub name: String,
    pub city: String,
    pub state: String,
    pub phone: Option<String>,
    pub genres: Genres,
    pub image_link: Option<String>,
    pub facebook_link: Option<String>,
    pub website: Option<String>,
    pub seeking_venue: bool,
    pub seeking_description: Option<String>,
}

#[derive(AsChangeset, Debug, Clone, Default, PartialEq)]
#[diesel(table_name = artists)]
pub struct ArtistChanges {
    pub name: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub phone: Option<Option<String>>,
    pub genres: Option<Genres>,
    pub image_link: Option<Option<String>>,
    pub facebook_link: Option<Option<String>>,
    pub website: Option<Option<String>>,
    pub seeking_venue: Option<bool>,
    pub seeking_description: Option<Option<String>>,
}

impl ArtistChanges {
    pub fn is_empty(&self) -> bool {
        *self == ArtistChanges::default()
    }
}

#[derive(Queryable, Selectable, Identifiable, Serialize, Deserialize, Debug, Clone, PartialEq)]
#[diesel(table_name = shows)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct Show {
    pub id: Id,
    pub start_time: NaiveDateTime,
    pub venue_id: Id,
    pub artist_id: Id,
}

#[derive(Insertable, Debug, Clone)]
#[diesel(table_name = shows)]
pub struct NewShow {
    pub start_time: NaiveDateTime,
    pub venue_id: Id,
    pub artist_id: Id,
}

/// Anything with a start time that can be sorted into past or upcoming.
pub trait Scheduled {
    fn start_time(&self) -> NaiveDateTime;
}

/// A show as seen from its venue: the performing artist and the start time.
#[derive(Queryable, Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ArtistShow {
    pub artist_id: Id,
    pub artist_name: String,
    pub artist_image_link: Option<String>,
    pub start_time: NaiveDateTime,
}

impl Scheduled for ArtistShow {
    fn start_time(&self) -> NaiveDateTime {
        self.start_time
    }
}

/// A show as seen from its artist: the hosting venue and the start time.
#[derive(Queryable, Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct VenueShow {
    pub venue_id: Id,
    pub venue_name: String,
    pub venue_image_link: Option<String>,
    pub start_time: NaiveDateTime,
}

impl Scheduled for VenueShow {
    fn start_time(&self) -> NaiveDateTime {
        self.start_time
    }
}

/// Shows split at "now". Upcoming includes shows starting exactly now.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Buckets<T> {
    pub past: Vec<T>,
    pub upcoming: Vec<T>,
}

impl<T> Default for Buckets<T> {
    fn default() -> Self {
        Buckets {
            past: Vec::new(),
            upcoming: Vec::new(),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct VenueWithShows {
    #[serde(flatten)]
    pub venue: Venue,
    pub past_shows: Vec<ArtistShow>,
    pub past_shows_count: usize,
    pub upcoming_shows: Vec<ArtistShow>,
    pub upcoming_shows_count: usize,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct ArtistWithShows {
    #[serde(flatten)]
    pub artist: Artist,
    pub past_shows: Vec<VenueShow>,
    pub past_shows_count: usize,
    pub upcoming_shows: Vec<VenueShow>,
    pub upcoming_shows_count: usize,
}

/// One entry of a listing or search result.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Summary {
    pub id: Id,
    pub name: String,
    pub num_upcoming_shows: i64,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Locality {
    pub city: String,
    pub state: String,
    pub venues: Vec<Summary>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct SearchResults {
    pub count: usize,
    pub data: Vec<Summary>,
}

#[derive(Queryable, Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ArtistEntry {
    pub id: Id,
    pub name: String,
}

#[derive(Queryable, Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ShowListing {
    pub venue_id: Id,
    pub venue_name: String,
    pub artist_id: Id,
    pub artist_name: String,
    pub artist_image_link: Option<String>,
    pub start_time: NaiveDateTime,
}
