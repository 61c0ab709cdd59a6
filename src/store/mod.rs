mod db;
pub mod action;
pub mod model;
pub mod query;

use chrono::{Local, NaiveDateTime};
use diesel::SqliteConnection;
use rocket::fairing::{self, Fairing, Info, Kind};
use rocket::request::{FromRequest, Outcome, Request};
use rocket::{Build, Rocket};

pub use action::{create_show, Actions};
pub use db::Genres;
pub use model::*;

pub type Id = i32;

/// Wall-clock time that shows are compared against.
pub fn now() -> NaiveDateTime {
    Local::now().naive_local()
}

/// Database handle for one request. The pooled connection is returned when
/// the request finishes, whatever its outcome.
pub struct Store(db::Connection);

impl Store {
    pub fn fairing() -> StoreFairing {
        StoreFairing
    }

    pub async fn run<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&mut SqliteConnection) -> R + Send + 'static,
        R: Send + 'static,
    {
        self.0.run(f).await
    }
}

pub struct StoreFairing;

#[rocket::async_trait]
impl Fairing for StoreFairing {
    fn info(&self) -> Info {
        Info {
            name: "Booking Store Fairing",
            kind: Kind::Ignite,
        }
    }

    async fn on_ignite(&self, rocket: Rocket<Build>) -> fairing::Result {
        let rocket = db::Connection::fairing().on_ignite(rocket).await?;
        db::initialize(rocket).await
    }
}

#[rocket::async_trait]
impl<'r> FromRequest<'r> for Store {
    type Error = ();

    async fn from_request(request: &'r Request<'_>) -> Outcome<Self, Self::Error> {
        db::Connection::from_request(request).await.map(Store)
    }
}
