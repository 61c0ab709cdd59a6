use diesel::Connection as _;
use maud::{html, Markup};
use rocket::form::{self, Form};
use rocket::request::FlashMessage;
use rocket::response::{Flash, Redirect};
use rocket::Route;

use super::forms::{ArtistEditForm, ArtistForm, SearchForm};
use super::{
    base_html, delete_button, format_datetime, genre_list, optional_field, optional_link, report, search_box,
    text_field, DateFormat, Page,
};
use crate::error::{Error, Result};
use crate::store::{
    now, query, Actions, Artist, ArtistChanges, ArtistWithShows, Id, NewArtist, SearchResults, Store, VenueShow,
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

#[get("/artists")]
async fn index(store: Store, flash: Option<FlashMessage<'_>>) -> Result<Markup> {
    let artists = store.run(|conn| query::artist_entries(conn)).await?;

    Ok(base_html(
        html! {
            div.artists {
                ( search_box("/artists/search", "Find an artist", "") )
                a.button href="/artists/create" { "Post an artist" }
                ul.items {
                    @for artist in &artists {
                        li { a href=( format!("/artists/{}", artist.id) ) { ( artist.name ) } }
                    }
                }
            }
        },
        &Page::Artists,
        flash.as_ref(),
    ))
}

#[post("/artists/search", data = "<form>")]
async fn search(store: Store, form: std::result::Result<Form<SearchForm>, form::Errors<'_>>) -> Result<Markup> {
    let term = form?.term().to_owned();
    let lookup = term.clone();
    let results = store
        .run(move |conn| query::search_artists(conn, &lookup, now()))
        .await?;

    Ok(base_html(render_results(&results, &term), &Page::Artists, None))
}

fn render_results(results: &SearchResults, term: &str) -> Markup {
    html! {
        div.search-results {
            ( search_box("/artists/search", "Find an artist", term) )
            h2 { "Number of search results for \"" ( term ) "\": " ( results.count ) }
            ul.items {
                @for artist in &results.data {
                    li {
                        a href=( format!("/artists/{}", artist.id) ) { ( artist.name ) }
                        span.upcoming { ( artist.num_upcoming_shows ) " upcoming" }
                    }
                }
            }
        }
    }
}

#[get("/artists/<id>")]
async fn details(store: Store, id: Id, flash: Option<FlashMessage<'_>>) -> Result<Markup> {
    let detail = store
        .run(move |conn| query::artist_with_shows(conn, id, now()))
        .await?;

    Ok(base_html(render_artist(&detail), &Page::Artists, flash.as_ref()))
}

fn render_artist(detail: &ArtistWithShows) -> Markup {
    let artist = &detail.artist;

    html! {
        div.entity.artist {
            div.details {
                h1 { ( artist.name ) }
                p.id { "ID: " ( artist.id ) }
                ( genre_list(&artist.genres) )
                p.locality { ( artist.city ) ", " ( artist.state ) }
                @if let Some(phone) = &artist.phone {
                    p.phone { ( phone ) }
                }
                p.links {
                    ( optional_link(artist.website.as_deref(), "Website") )
                    " "
                    ( optional_link(artist.facebook_link.as_deref(), "Facebook") )
                }
                @if artist.seeking_venue {
                    div.seeking {
                        p { "Currently seeking performance venues" }
                        @if let Some(description) = &artist.seeking_description {
                            p { ( description ) }
                        }
                    }
                } @else {
                    p.not-seeking { "Not currently seeking performance venues" }
                }
                @if let Some(image) = &artist.image_link {
                    img src=(image) alt="Artist Image";
                }
            }
            div.actions {
                a.button href=( format!("/artists/{}/edit", artist.id) ) { "Edit" }
                ( delete_button(&format!("/artists/{}/delete", artist.id), "Delete") )
            }
            section.shows {
                h2 { ( detail.upcoming_shows_count ) " Upcoming Shows" }
                ul {
                    @for show in &detail.upcoming_shows {
                        li { ( venue_show(show) ) }
                    }
                }
            }
            section.shows {
                h2 { ( detail.past_shows_count ) " Past Shows" }
                ul {
                    @for show in &detail.past_shows {
                        li { ( venue_show(show) ) }
                    }
                }
            }
        }
    }
}

fn venue_show(show: &VenueShow) -> Markup {
    html! {
        @if let Some(image) = &show.venue_image_link {
            img src=(image) alt="Venue Image";
        }
        a href=( format!("/venues/{}", show.venue_id) ) { ( show.venue_name ) }
        " "
        time { ( format_datetime(&show.start_time, DateFormat::Full) ) }
    }
}

fn artist_form(action: &str, title: &str, artist: Option<&Artist>) -> Markup {
    let editing = artist.is_some();
    let genres = artist.map(|a| a.genres.to_string());

    html! {
        form.entity-form method="post" action=(action) {
            h2 { ( title ) }
            ( text_field("Name", "name", artist.map(|a| a.name.as_str()), true) )
            ( text_field("City", "city", artist.map(|a| a.city.as_str()), true) )
            ( text_field("State", "state", artist.map(|a| a.state.as_str()), true) )
            ( optional_field("Phone", "phone", artist.and_then(|a| a.phone.as_deref()), editing) )
            ( optional_field("Genres (comma separated)", "genres", genres.as_deref(), editing) )
            ( optional_field("Image link", "image_link", artist.and_then(|a| a.image_link.as_deref()), editing) )
            ( optional_field("Facebook link", "facebook_link", artist.and_then(|a| a.facebook_link.as_deref()), editing) )
            ( optional_field("Website", "website", artist.and_then(|a| a.website.as_deref()), editing) )
            ( optional_field(
                "Looking for venues? Describe what you want",
                "seeking_description",
                artist.and_then(|a| a.seeking_description.as_deref()),
                editing,
            ) )
            button type="submit" { ( title ) }
        }
    }
}

#[get("/artists/create")]
fn create_form() -> Markup {
    base_html(artist_form("/artists/create", "List a new artist", None), &Page::Artists, None)
}

#[post("/artists/create", data = "<form>")]
async fn create(store: Store, form: std::result::Result<Form<ArtistForm>, form::Errors<'_>>) -> Result<Flash<Redirect>> {
    let new: NewArtist = form?.into_inner().into();
    let name = new.name.clone();

    let outcome = store
        .run(move |conn| conn.transaction(|conn| Actions::<Artist>::create(conn, new)))
        .await
        .map_err(Error::from);

    report(
        outcome,
        uri!("/"),
        |artist: Artist| format!("Artist {} was successfully listed!", artist.name),
        format!("An error occurred. Artist {} could not be listed.", name),
    )
}

#[get("/artists/<id>/edit")]
async fn edit_form(store: Store, id: Id) -> Result<Markup> {
    let artist: Artist = store.run(move |conn| Actions::<Artist>::read(conn, id)).await?;

    Ok(base_html(
        artist_form(&format!("/artists/{}/edit", id), "Edit artist", Some(&artist)),
        &Page::Artists,
        None,
    ))
}

#[post("/artists/<id>/edit", data = "<form>")]
async fn edit(store: Store, id: Id, form: std::result::Result<Form<ArtistEditForm>, form::Errors<'_>>) -> Result<Flash<Redirect>> {
    let changes: ArtistChanges = form?.into_inner().into();

    let outcome = store
        .run(move |conn| conn.transaction(|conn| Actions::<Artist>::update(conn, id, changes)))
        .await
        .map_err(Error::from);

    report(
        outcome,
        uri!(details(id)),
        |artist: Artist| format!("Artist {} was successfully updated!", artist.name),
        format!("An error occurred. Artist id {} could not be updated.", id),
    )
}

#[delete("/artists/<id>/delete")]
async fn delete(store: Store, id: Id) -> Result<Flash<Redirect>> {
    let outcome = store
        .run(move |conn| conn.transaction(|conn| Actions::<Artist>::delete(conn, id)))
        .await
        .map_err(Error::from);

    report(
        outcome,
        uri!("/"),
        |_| format!("Artist id {} was successfully deleted!", id),
        format!("An error occurred. Artist id {} could not be deleted.", id),
    )
}

// Ids that are not numbers name no artist. These rank below the handlers
// above and only run when their id failed to parse.

#[get("/artists/<_>", rank = 2)]
fn unknown_details() -> Error {
    Error::NotFound
}

#[get("/artists/<_>/edit", rank = 2)]
fn unknown_edit_form() -> Error {
    Error::NotFound
}

#[post("/artists/<_>/edit", rank = 2)]
fn unknown_edit() -> Error {
    Error::NotFound
}

#[delete("/artists/<_>/delete", rank = 2)]
fn unknown_delete() -> Error {
    Error::NotFound
}
