use diesel::Connection as _;
use maud::{html, Markup};
use rocket::form::{self, Form};
use rocket::request::FlashMessage;
use rocket::response::{Flash, Redirect};
use rocket::Route;

use super::forms::ShowForm;
use super::{base_html, format_datetime, report, DateFormat, Page};
use crate::error::{Error, Result};
use crate::store::{create_show, query, Show, ShowListing, Store};

pub fn routes() -> Vec<Route> {
    routes![index, create_form, create]
}

#[get("/shows")]
async fn index(store: Store, flash: Option<FlashMessage<'_>>) -> Result<Markup> {
    let listings = store.run(|conn| query::show_listings(conn)).await?;

    Ok(base_html(
        html! {
            div.shows {
                a.button href="/shows/create" { "Post a show" }
                ul.items {
                    @for listing in &listings {
                        li { ( render_listing(listing) ) }
                    }
                }
            }
        },
        &Page::Shows,
        flash.as_ref(),
    ))
}

fn render_listing(listing: &ShowListing) -> Markup {
    html! {
        @if let Some(image) = &listing.artist_image_link {
            img src=(image) alt="Artist Image";
        }
        time { ( format_datetime(&listing.start_time, DateFormat::Medium) ) }
        a.artist href=( format!("/artists/{}", listing.artist_id) ) { ( listing.artist_name ) }
        " playing at "
        a.venue href=( format!("/venues/{}", listing.venue_id) ) { ( listing.venue_name ) }
    }
}

#[get("/shows/create")]
fn create_form() -> Markup {
    base_html(
        html! {
            form.entity-form method="post" action="/shows/create" {
                h2 { "List a new show" }
                label.field {
                    span { "Artist ID" }
                    input type="number" name="artist_id" required;
                }
                label.field {
                    span { "Venue ID" }
                    input type="number" name="venue_id" required;
                }
                label.field {
                    span { "Start time" }
                    input type="datetime-local" name="start_time" required;
                }
                button type="submit" { "Create show" }
            }
        },
        &Page::Shows,
        None,
    )
}

#[post("/shows/create", data = "<form>")]
async fn create(store: Store, form: std::result::Result<Form<ShowForm>, form::Errors<'_>>) -> Result<Flash<Redirect>> {
    let new = form?.into_inner().into_new()?;

    let outcome = store
        .run(move |conn| conn.transaction(|conn| create_show(conn, new)))
        .await
        .map_err(Error::from);

    report(
        outcome,
        uri!("/"),
        |show: Show| {
            log::debug!("Booked show {} at venue {}.", show.id, show.venue_id);
            "Show was successfully listed!".to_owned()
        },
        "An error occurred. Show could not be listed.".to_owned(),
    )
}
