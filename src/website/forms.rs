//! Form submissions and their translation into store records.
//!
//! Create forms require the identifying fields to be non-blank. Edit forms
//! take every field as optional: a field that is missing or blank leaves the
//! column alone. An optional column is only cleared when its name is listed
//! in the repeated `clear` field.

use chrono::{DateTime, NaiveDateTime};
use rocket::form;

use crate::error::{Error, Result};
use crate::store::{ArtistChanges, Genres, Id, NewArtist, NewShow, NewVenue, VenueChanges};

fn filled<'v>(value: &str) -> form::Result<'v, ()> {
    if value.trim().is_empty() {
        Err(form::Error::validation("must not be blank"))?;
    }

    Ok(())
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

fn required_change(value: Option<String>) -> Option<String> {
    non_blank(value)
}

fn clears(clear: &[String], field: &str) -> bool {
    clear.iter().any(|c| c == field)
}

fn optional_change(value: Option<String>, clear: &[String], field: &str) -> Option<Option<String>> {
    if clears(clear, field) {
        return Some(None);
    }

    non_blank(value).map(Some)
}

fn genres_change(value: Option<String>, clear: &[String]) -> Option<Genres> {
    if clears(clear, "genres") {
        return Some(Genres::default());
    }

    value.map(|v| Genres::parse(&v)).filter(|g| !g.is_empty())
}

fn seeking(description: &Option<String>) -> bool {
    description.is_some()
}

#[derive(FromForm, Debug, Default)]
pub struct SearchForm {
    pub search_term: Option<String>,
}

impl SearchForm {
    pub fn term(&self) -> &str {
        self.search_term.as_deref().unwrap_or_default()
    }
}

#[derive(FromForm, Debug, Default)]
pub struct VenueForm {
    #[field(validate = filled())]
    pub name: String,
    #[field(validate = filled())]
    pub city: String,
    #[field(validate = filled())]
    pub state: String,
    #[field(validate = filled())]
    pub address: String,
    pub phone: Option<String>,
    pub image_link: Option<String>,
    pub facebook_link: Option<String>,
    pub genres: Option<String>,
    pub website: Option<String>,
    pub seeking_description: Option<String>,
}

impl From<VenueForm> for NewVenue {
    fn from(form: VenueForm) -> NewVenue {
        let seeking_description = non_blank(form.seeking_description);

        NewVenue {
            name: form.name,
            city: form.city,
            state: form.state,
            address: form.address,
            phone: non_blank(form.phone),
            image_link: non_blank(form.image_link),
            facebook_link: non_blank(form.facebook_link),
            genres: form.genres.as_deref().map(Genres::parse).unwrap_or_default(),
            website: non_blank(form.website),
            seeking_talent: seeking(&seeking_description),
            seeking_description,
        }
    }
}

#[derive(FromForm, Debug, Default)]
pub struct VenueEditForm {
    pub name: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub image_link: Option<String>,
    pub facebook_link: Option<String>,
    pub genres: Option<String>,
    pub website: Option<String>,
    pub seeking_description: Option<String>,
    pub clear: Vec<String>,
}

impl From<VenueEditForm> for VenueChanges {
    fn from(form: VenueEditForm) -> VenueChanges {
        let seeking_description = optional_change(form.seeking_description, &form.clear, "seeking_description");

        VenueChanges {
            name: required_change(form.name),
            city: required_change(form.city),
            state: required_change(form.state),
            address: required_change(form.address),
            phone: optional_change(form.phone, &form.clear, "phone"),
            image_link: optional_change(form.image_link, &form.clear, "image_link"),
            facebook_link: optional_change(form.facebook_link, &form.clear, "facebook_link"),
            genres: genres_change(form.genres, &form.clear),
            website: optional_change(form.website, &form.clear, "website"),
            seeking_talent: seeking_description.as_ref().map(seeking),
            seeking_description,
        }
    }
}

#[derive(FromForm, Debug, Default)]
pub struct ArtistForm {
    #[field(validate = filled())]
    pub name: String,
    #[field(validate = filled())]
    pub city: String,
    #[field(validate = filled())]
    pub state: String,
    pub phone: Option<String>,
    pub image_link: Option<String>,
    pub facebook_link: Option<String>,
    pub genres: Option<String>,
    pub website: Option<String>,
    pub seeking_description: Option<String>,
}

impl From<ArtistForm> for NewArtist {
    fn from(form: ArtistForm) -> NewArtist {
        let seeking_description = non_blank(form.seeking_description);

        NewArtist {
            name: form.name,
            city: form.city,
            state: form.state,
            phone: non_blank(form.phone),
            genres: form.genres.as_deref().map(Genres::parse).unwrap_or_default(),
            image_link: non_blank(form.image_link),
            facebook_link: non_blank(form.facebook_link),
            website: non_blank(form.website),
            seeking_venue: seeking(&seeking_description),
            seeking_description,
        }
    }
}

#[derive(FromForm, Debug, Default)]
pub struct ArtistEditForm {
    pub name: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub phone: Option<String>,
    pub image_link: Option<String>,
    pub facebook_link: Option<String>,
    pub genres: Option<String>,
    pub website: Option<String>,
    pub seeking_description: Option<String>,
    pub clear: Vec<String>,
}

impl From<ArtistEditForm> for ArtistChanges {
    fn from(form: ArtistEditForm) -> ArtistChanges {
        let seeking_description = optional_change(form.seeking_description, &form.clear, "seeking_description");

        ArtistChanges {
            name: required_change(form.name),
            city: required_change(form.city),
            state: required_change(form.state),
            phone: optional_change(form.phone, &form.clear, "phone"),
            genres: genres_change(form.genres, &form.clear),
            image_link: optional_change(form.image_link, &form.clear, "image_link"),
            facebook_link: optional_change(form.facebook_link, &form.clear, "facebook_link"),
            website: optional_change(form.website, &form.clear, "website"),
            seeking_venue: seeking_description.as_ref().map(seeking),
            seeking_description,
        }
    }
}

#[derive(FromForm, Debug)]
pub struct ShowForm {
    pub artist_id: Id,
    pub venue_id: Id,
    #[field(validate = len(1..))]
    pub start_time: String,
}

const START_TIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

/// Accepts `datetime-local` input values, plain `YYYY-MM-DD HH:MM[:SS]`
/// and RFC 3339 timestamps (whose offset is dropped).
pub fn parse_start_time(input: &str) -> Result<NaiveDateTime> {
    let input = input.trim();

    if let Ok(time) = DateTime::parse_from_rfc3339(input) {
        return Ok(time.naive_local());
    }

    START_TIME_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(input, format).ok())
        .ok_or_else(|| Error::Validation(format!("unrecognized start time {:?}", input)))
}

impl ShowForm {
    pub fn into_new(self) -> Result<NewShow> {
        Ok(NewShow {
            start_time: parse_start_time(&self.start_time)?,
            venue_id: self.venue_id,
            artist_id: self.artist_id,
        })
    }
}
