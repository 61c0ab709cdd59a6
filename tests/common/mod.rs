#![allow(dead_code)]

use rocket::http::{ContentType, RawStr, Status};
use rocket::local::blocking::Client;

/// A client on a fresh in-memory database. A single pooled connection keeps
/// every request on the same database.
pub fn client() -> Client {
    let figment = rocket::Config::figment()
        .merge(("databases.sqlite_database.url", ":memory:"))
        .merge(("databases.sqlite_database.pool_size", 1));

    Client::tracked(fyyur::rocket_with(figment)).expect("valid rocket instance")
}

/// A client preloaded with the sample directory.
pub fn seeded_client() -> Client {
    let client = client();
    load_fixtures(&client);
    client
}

pub fn post_form(client: &Client, uri: &str, fields: &[(&str, &str)]) -> Status {
    let body = fields
        .iter()
        .map(|(key, value)| format!("{}={}", RawStr::new(key).percent_encode(), RawStr::new(value).percent_encode()))
        .collect::<Vec<_>>()
        .join("&");

    client
        .post(uri.to_owned())
        .header(ContentType::Form)
        .body(body)
        .dispatch()
        .status()
}

pub fn get_json(client: &Client, uri: &str) -> serde_json::Value {
    let response = client.get(uri.to_owned()).dispatch();
    assert_eq!(response.status(), Status::Ok, "GET {}", uri);
    response.into_json().expect("json body")
}

pub const VENUES: &[&[(&str, &str)]] = &[
    &[
        ("name", "The Musical Hop"),
        ("genres", "Jazz, Reggae, Swing, Classical, Folk"),
        ("address", "1015 Folsom Street"),
        ("city", "San Francisco"),
        ("state", "CA"),
        ("phone", "123-123-1234"),
        ("website", "https://www.themusicalhop.com"),
        ("facebook_link", "https://www.facebook.com/TheMusicalHop"),
        (
            "seeking_description",
            "We are on the lookout for a local artist to play every two weeks. Please call us.",
        ),
        ("image_link", "https://images.unsplash.com/photo-1543900694-133f37abaaa5"),
    ],
    &[
        ("name", "The Dueling Pianos Bar"),
        ("genres", "Classical, R&B, Hip-Hop"),
        ("address", "335 Delancey Street"),
        ("city", "New York"),
        ("state", "NY"),
        ("phone", "914-003-1132"),
        ("website", "https://www.theduelingpianos.com"),
        ("facebook_link", "https://www.facebook.com/theduelingpianos"),
        ("image_link", "https://images.unsplash.com/photo-1497032205916-ac775f0649ae"),
    ],
    &[
        ("name", "Park Square Live Music & Coffee"),
        ("genres", "Rock n Roll, Jazz, Classical, Folk"),
        ("address", "34 Whiskey Moore Ave"),
        ("city", "San Francisco"),
        ("state", "CA"),
        ("phone", "415-000-1234"),
        ("website", "https://www.parksquarelivemusicandcoffee.com"),
        ("facebook_link", "https://www.facebook.com/ParkSquareLiveMusicAndCoffee"),
        ("image_link", "https://images.unsplash.com/photo-1485686531765-ba63b07845a7"),
    ],
];

pub const ARTISTS: &[&[(&str, &str)]] = &[
    &[
        ("name", "Guns N Petals"),
        ("genres", "Rock n Roll"),
        ("city", "San Francisco"),
        ("state", "CA"),
        ("phone", "326-123-5000"),
        ("website", "https://www.gunsnpetalsband.com"),
        ("facebook_link", "https://www.facebook.com/GunsNPetals"),
        (
            "seeking_description",
            "Looking for shows to perform at in the San Francisco Bay Area!",
        ),
        ("image_link", "https://images.unsplash.com/photo-1549213783-8284d0336c4f"),
    ],
    &[
        ("name", "Matt Quevedo"),
        ("genres", "Jazz"),
        ("city", "New York"),
        ("state", "NY"),
        ("phone", "300-400-5000"),
        ("facebook_link", "https://www.facebook.com/mattquevedo923251523"),
        ("image_link", "https://images.unsplash.com/photo-1495223153807-b916f75de8c5"),
    ],
    &[
        ("name", "The Wild Sax Band"),
        ("genres", "Jazz, Classical"),
        ("city", "San Francisco"),
        ("state", "CA"),
        ("phone", "432-325-5432"),
        ("image_link", "https://images.unsplash.com/photo-1558369981-f9ca78462e61"),
    ],
];

/// (venue id, artist id, start time). Ids follow the insertion order above.
pub const SHOWS: &[(&str, &str, &str)] = &[
    ("1", "1", "2019-05-21T21:30:00.000Z"),
    ("3", "2", "2019-06-15T23:00:00.000Z"),
    ("3", "3", "2035-04-01T20:00:00.000Z"),
    ("3", "3", "2035-04-08T20:00:00.000Z"),
    ("3", "3", "2035-04-15T20:00:00.000Z"),
];

pub fn load_fixtures(client: &Client) {
    for venue in VENUES {
        assert_eq!(post_form(client, "/venues/create", venue), Status::SeeOther);
    }

    for artist in ARTISTS {
        assert_eq!(post_form(client, "/artists/create", artist), Status::SeeOther);
    }

    for (venue_id, artist_id, start_time) in SHOWS {
        let fields = [("venue_id", *venue_id), ("artist_id", *artist_id), ("start_time", *start_time)];
        assert_eq!(post_form(client, "/shows/create", &fields), Status::SeeOther);
    }
}
