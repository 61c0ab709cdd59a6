use diesel::Connection as _;
use maud::{html, Markup};
use rocket::form::{self, Form};
use rocket::request::FlashMessage;
use rocket::response::{Flash, Redirect};
use rocket::Route;

use super::forms::{SearchForm, VenueEditForm, VenueForm};
use super::{
    base_html, delete_button, format_datetime, genre_list, optional_field, optional_link, report, search_box,
    text_field, DateFormat, Page,
};
use crate::error::{Error, Result};
use crate::store::{
    now, query, Actions, ArtistShow, Id, NewVenue, SearchResults, Store, Venue, VenueChanges, VenueWithShows,
};

pub fn routes() -> Vec<Route> {
    routes![
        index,
        search,
        details,
        create_form,
        create,
        edit_form,
        edit,
        delete,
        unknown_details,
        unknown_edit_form,
        unknown_edit,
        unknown_delete
    ]
}

#[get("/venues")]
async fn index(store: Store, flash: Option<FlashMessage<'_>>) -> Result<Markup> {
    let localities = store
        .run(|conn| query::venues_by_locality(conn, now()))
        .await?;

    Ok(base_html(
        html! {
            div.venues {
                ( search_box("/venues/search", "Find a venue", "") )
                a.button href="/venues/create" { "Post a venue" }
                @for locality in &localities {
                    section.locality {
                        h2 { ( locality.city ) ", " ( locality.state ) }
                        ul.items {
                            @for venue in &locality.venues {
                                li {
                                    a href=( format!("/venues/{}", venue.id) ) { ( venue.name ) }
                                    span.upcoming { ( venue.num_upcoming_shows ) " upcoming" }
                                }
                            }
                        }
                    }
                }
            }
        },
        &Page::Venues,
        flash.as_ref(),
    ))
}

#[post("/venues/search", data = "<form>")]
async fn search(store: Store, form: std::result::Result<Form<SearchForm>, form::Errors<'_>>) -> Result<Markup> {
    let term = form?.term().to_owned();
    let lookup = term.clone();
    let results = store
        .run(move |conn| query::search_venues(conn, &lookup, now()))
        .await?;

    Ok(base_html(
        render_results(&results, &term),
        &Page::Venues,
        None,
    ))
}

fn render_results(results: &SearchResults, term: &str) -> Markup {
    html! {
        div.search-results {
            ( search_box("/venues/search", "Find a venue", term) )
            h2 { "Number of search results for \"" ( term ) "\": " ( results.count ) }
            ul.items {
                @for venue in &results.data {
                    li {
                        a href=( format!("/venues/{}", venue.id) ) { ( venue.name ) }
                        span.upcoming { ( venue.num_upcoming_shows ) " upcoming" }
                    }
                }
            }
        }
    }
}

#[get("/venues/<id>")]
async fn details(store: Store, id: Id, flash: Option<FlashMessage<'_>>) -> Result<Markup> {
    let detail = store
        .run(move |conn| query::venue_with_shows(conn, id, now()))
        .await?;

    Ok(base_html(render_venue(&detail), &Page::Venues, flash.as_ref()))
}

fn render_venue(detail: &VenueWithShows) -> Markup {
    let venue = &detail.venue;

    html! {
        div.entity.venue {
            div.details {
                h1 { ( venue.name ) }
                p.id { "ID: " ( venue.id ) }
                ( genre_list(&venue.genres) )
                p.address { ( venue.address ) br; ( venue.city ) ", " ( venue.state ) }
                @if let Some(phone) = &venue.phone {
                    p.phone { ( phone ) }
                }
                p.links {
                    ( optional_link(venue.website.as_deref(), "Website") )
                    " "
                    ( optional_link(venue.facebook_link.as_deref(), "Facebook") )
                }
                @if venue.seeking_talent {
                    div.seeking {
                        p { "Currently seeking talent" }
                        @if let Some(description) = &venue.seeking_description {
                            p { ( description ) }
                        }
                    }
                } @else {
                    p.not-seeking { "Not currently seeking talent" }
                }
                @if let Some(image) = &venue.image_link {
                    img src=(image) alt="Venue Image";
                }
            }
            div.actions {
                a.button href=( format!("/venues/{}/edit", venue.id) ) { "Edit" }
                ( delete_button(&format!("/venues/{}/delete", venue.id), "Delete") )
            }
            section.shows {
                h2 { ( detail.upcoming_shows_count ) " Upcoming Shows" }
                ul {
                    @for show in &detail.upcoming_shows {
                        li { ( artist_show(show) ) }
                    }
                }
            }
            section.shows {
                h2 { ( detail.past_shows_count ) " Past Shows" }
                ul {
                    @for show in &detail.past_shows {
                        li { ( artist_show(show) ) }
                    }
                }
            }
        }
    }
}

fn artist_show(show: &ArtistShow) -> Markup {
    html! {
        @if let Some(image) = &show.artist_image_link {
            img src=(image) alt="Artist Image";
        }
        a href=( format!("/artists/{}", show.artist_id) ) { ( show.artist_name ) }
        " "
        time { ( format_datetime(&show.start_time, DateFormat::Full) ) }
    }
}

fn venue_form(action: &str, title: &str, venue: Option<&Venue>) -> Markup {
    let editing = venue.is_some();
    let genres = venue.map(|v| v.genres.to_string());

    html! {
        form.entity-form method="post" action=(action) {
            h2 { ( title ) }
            ( text_field("Name", "name", venue.map(|v| v.name.as_str()), true) )
            ( text_field("City", "city", venue.map(|v| v.city.as_str()), true) )
            ( text_field("State", "state", venue.map(|v| v.state.as_str()), true) )
            ( text_field("Address", "address", venue.map(|v| v.address.as_str()), true) )
            ( optional_field("Phone", "phone", venue.and_then(|v| v.phone.as_deref()), editing) )
            ( optional_field("Genres (comma separated)", "genres", genres.as_deref(), editing) )
            ( optional_field("Image link", "image_link", venue.and_then(|v| v.image_link.as_deref()), editing) )
            ( optional_field("Facebook link", "facebook_link", venue.and_then(|v| v.facebook_link.as_deref()), editing) )
            ( optional_field("Website", "website", venue.and_then(|v| v.website.as_deref()), editing) )
            ( optional_field(
                "Looking for talent? Describe what you want",
                "seeking_description",
                venue.and_then(|v| v.seeking_description.as_deref()),
                editing,
            ) )
            button type="submit" { ( title ) }
        }
    }
}

#[get("/venues/create")]
fn create_form() -> Markup {
    base_html(venue_form("/venues/create", "List a new venue", None), &Page::Venues, None)
}

#[post("/venues/create", data = "<form>")]
async fn create(store: Store, form: std::result::Result<Form<VenueForm>, form::Errors<'_>>) -> Result<Flash<Redirect>> {
    let new: NewVenue = form?.into_inner().into();
    let name = new.name.clone();

    let outcome = store
        .run(move |conn| conn.transaction(|conn| Actions::<Venue>::create(conn, new)))
        .await
        .map_err(Error::from);

    report(
        outcome,
        uri!("/"),
        |venue: Venue| format!("Venue {} was successfully listed!", venue.name),
        format!("An error occurred. Venue {} could not be listed.", name),
    )
}

#[get("/venues/<id>/edit")]
async fn edit_form(store: Store, id: Id) -> Result<Markup> {
    let venue: Venue = store.run(move |conn| Actions::<Venue>::read(conn, id)).await?;

    Ok(base_html(
        venue_form(&format!("/venues/{}/edit", id), "Edit venue", Some(&venue)),
        &Page::Venues,
        None,
    ))
}

#[post("/venues/<id>/edit", data = "<form>")]
async fn edit(store: Store, id: Id, form: std::result::Result<Form<VenueEditForm>, form::Errors<'_>>) -> Result<Flash<Redirect>> {
    let changes: VenueChanges = form?.into_inner().into();

    let outcome = store
        .run(move |conn| conn.transaction(|conn| Actions::<Venue>::update(conn, id, changes)))
        .await
        .map_err(Error::from);

    report(
        outcome,
        uri!(details(id)),
        |venue: Venue| format!("Venue {} was successfully updated!", venue.name),
        format!("An error occurred. Venue id {} could not be updated.", id),
    )
}

#[delete("/venues/<id>/delete")]
async fn delete(store: Store, id: Id) -> Result<Flash<Redirect>> {
    let outcome = store
        .run(move |conn| conn.transaction(|conn| Actions::<Venue>::delete(conn, id)))
        .await
        .map_err(Error::from);

    report(
        outcome,
        uri!("/"),
        |_| format!("Venue id {} was successfully deleted!", id),
        format!("An error occurred. Venue id {} could not be deleted.", id),
    )
}

// Ids that are not numbers name no venue. These rank below the handlers
// above and only run when their id failed to parse.

#[get("/venues/<_>", rank = 2)]
fn unknown_details() -> Error {
    Error::NotFound
}

#[get("/venues/<_>/edit", rank = 2)]
fn unknown_edit_form() -> Error {
    Error::NotFound
}

#[post("/venues/<_>/edit", rank = 2)]
fn unknown_edit() -> Error {
    Error::NotFound
}

#[delete("/venues/<_>/delete", rank = 2)]
fn unknown_delete() -> Error {
    Error::NotFound
}
