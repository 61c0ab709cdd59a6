use rocket::http::Status;
use rocket::serde::json::Json;
use rocket::{Build, Request, Rocket};
use serde::Serialize;

use crate::error::{method_not_allowed, Error, Result};
use crate::store::{
    now, query, ArtistEntry, ArtistWithShows, Id, Locality, SearchResults, ShowListing, Store, VenueWithShows,
};

pub fn mount(rocket: Rocket<Build>, prefix: &'static str) -> Rocket<Build> {
    rocket
        .mount(
            prefix,
            routes![
                venues,
                search_venues,
                venue,
                artists,
                search_artists,
                artist,
                shows
            ],
        )
        .register(prefix, catchers![json_error])
}

#[get("/venues")]
async fn venues(store: Store) -> Result<Json<Vec<Locality>>> {
    let localities = store.run(|conn| query::venues_by_locality(conn, now())).await?;
    Ok(Json(localities))
}

#[get("/venues/search?<term>")]
async fn search_venues(store: Store, term: Option<String>) -> Result<Json<SearchResults>> {
    let term = term.unwrap_or_default();
    let results = store
        .run(move |conn| query::search_venues(conn, &term, now()))
        .await?;
    Ok(Json(results))
}

#[get("/venues/<id>")]
async fn venue(store: Store, id: Id) -> Result<Json<VenueWithShows>> {
    let detail = store
        .run(move |conn| query::venue_with_shows(conn, id, now()))
        .await?;
    Ok(Json(detail))
}

#[get("/artists")]
async fn artists(store: Store) -> Result<Json<Vec<ArtistEntry>>> {
    let entries = store.run(|conn| query::artist_entries(conn)).await?;
    Ok(Json(entries))
}

#[get("/artists/search?<term>")]
async fn search_artists(store: Store, term: Option<String>) -> Result<Json<SearchResults>> {
    let term = term.unwrap_or_default();
    let results = store
        .run(move |conn| query::search_artists(conn, &term, now()))
        .await?;
    Ok(Json(results))
}

#[get("/artists/<id>")]
async fn artist(store: Store, id: Id) -> Result<Json<ArtistWithShows>> {
    let detail = store
        .run(move |conn| query::artist_with_shows(conn, id, now()))
        .await?;
    Ok(Json(detail))
}

#[get("/shows")]
async fn shows(store: Store) -> Result<Json<Vec<ShowListing>>> {
    let listings = store.run(|conn| query::show_listings(conn)).await?;
    Ok(Json(listings))
}

#[derive(Serialize)]
struct ErrorInfo {
    message: String,
}

#[catch(default)]
fn json_error(status: Status, request: &Request<'_>) -> (Status, Json<ErrorInfo>) {
    let status = if status == Status::NotFound && method_not_allowed(request) {
        Error::MethodNotAllowed.status()
    } else {
        status
    };

    let error = ErrorInfo {
        message: status.reason().unwrap_or("error").to_lowercase(),
    };

    (status, Json(error))
}
