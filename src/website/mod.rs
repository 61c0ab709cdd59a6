mod artists;
mod errors;
pub mod forms;
mod shows;
mod venues;

use chrono::NaiveDateTime;
use maud::{html, Markup, DOCTYPE};
use rocket::http::uri::Origin;
use rocket::request::FlashMessage;
use rocket::response::{Flash, Redirect};
use rocket::{Build, Rocket};

use crate::error::{Error, Result};
use crate::store::Genres;

pub fn mount(rocket: Rocket<Build>, prefix: &'static str) -> Rocket<Build> {
    rocket
        .mount(prefix, routes![home])
        .mount(prefix, venues::routes())
        .mount(prefix, artists::routes())
        .mount(prefix, shows::routes())
        .register(prefix, errors::catchers())
}

#[get("/")]
fn home(flash: Option<FlashMessage<'_>>) -> Markup {
    base_html(
        html! {
            div.home {
                h1 { "Fyyur" }
                p { "Find venues to play at and artists to book." }
                ul {
                    li { a href="/venues/create" { "Post a venue" } }
                    li { a href="/artists/create" { "Post an artist" } }
                    li { a href="/shows/create" { "Post a show" } }
                }
            }
        },
        &Page::Home,
        flash.as_ref(),
    )
}

#[derive(PartialEq)]
enum Page {
    Home,
    Venues,
    Artists,
    Shows,
}

impl Page {
    fn url(&self) -> &'static str {
        use Page::*;

        match self {
            Home => "/",
            Venues => "/venues",
            Artists => "/artists",
            Shows => "/shows",
        }
    }

    fn title(&self) -> &'static str {
        use Page::*;

        match self {
            Home => "Home",
            Venues => "Venues",
            Artists => "Artists",
            Shows => "Shows",
        }
    }
}

fn base_html(main: Markup, current_page: &Page, flash: Option<&FlashMessage<'_>>) -> Markup {
    use Page::*;
    html! {
        ( DOCTYPE )
        html lang="en" {
            head {
                meta charset="utf-8";
                meta name="viewport" content="width=device-width, initial-scale=1";
                title { "Fyyur | " ( current_page.title() ) }
                link href="/static/main.css" rel="stylesheet";
            }
            body {
                header {
                    div.header {
                        a.title href="/" { h1 { "Fyyur" } }
                        nav {
                            ol {
                                @for page in vec![Venues, Artists, Shows] {
                                    li { ( nav_entry(page, current_page) ) }
                                }
                            }
                        }
                    }
                }
                main {
                    @if let Some(flash) = flash {
                        div class=(format!("flash {}", flash.kind())) { ( flash.message() ) }
                    }
                    ( main )
                }
            }
        }
    }
}

fn nav_entry(page: Page, current: &Page) -> Markup {
    html! {
        a.current[current == &page] href=( page.url() ) { ( page.title() ) }
    }
}

fn search_box(action: &str, placeholder: &str, term: &str) -> Markup {
    html! {
        form.search method="post" action=(action) {
            input type="search" name="search_term" placeholder=(placeholder) value=(term);
            button type="submit" { "Search" }
        }
    }
}

fn delete_button(action: &str, label: &str) -> Markup {
    html! {
        form.delete method="post" action=(action) {
            input type="hidden" name="_method" value="delete";
            button type="submit" { ( label ) }
        }
    }
}

fn text_field(label: &str, name: &str, value: Option<&str>, required: bool) -> Markup {
    html! {
        label.field {
            span { ( label ) }
            input type="text" name=(name) value=(value.unwrap_or_default()) required[required];
        }
    }
}

/// An optional text field. On edit forms it carries a checkbox that lists
/// the field under `clear`, since a blank value leaves the column alone.
fn optional_field(label: &str, name: &str, value: Option<&str>, editing: bool) -> Markup {
    html! {
        ( text_field(label, name, value, false) )
        @if editing {
            label.clear {
                input type="checkbox" name="clear" value=(name);
                " Clear"
            }
        }
    }
}

fn genre_list(genres: &Genres) -> Markup {
    html! {
        ul.genres {
            @for genre in genres.iter() {
                li { ( genre ) }
            }
        }
    }
}

fn optional_link(href: Option<&str>, text: &str) -> Markup {
    html! {
        @if let Some(href) = href {
            a href=(href) { ( text ) }
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum DateFormat {
    Full,
    Medium,
}

/// Renders a show time, e.g. `Tuesday May, 21, 2019 at 9:30PM` (full) or
/// `Tue 05, 21, 2019 9:30PM` (medium).
pub fn format_datetime(value: &NaiveDateTime, format: DateFormat) -> String {
    let pattern = match format {
        DateFormat::Full => "%A %B, %-d, %Y at %-I:%M%p",
        DateFormat::Medium => "%a %m, %d, %Y %-I:%M%p",
    };

    value.format(pattern).to_string()
}

/// Turns the outcome of a write into a flash notice on a redirect.
///
/// Database failures have already been rolled back by the surrounding
/// transaction; they are logged and reported softly. Anything else (missing
/// record, invalid input) goes to the error catchers.
fn report<T>(
    outcome: Result<T>,
    target: Origin<'static>,
    success: impl FnOnce(T) -> String,
    failure: String,
) -> Result<Flash<Redirect>> {
    match outcome {
        Ok(value) => {
            let message = success(value);
            log::info!("{}", message);
            Ok(Flash::success(Redirect::to(target), message))
        }
        Err(Error::Persistence(e)) => {
            log::error!("{}: {}", failure, e);
            Ok(Flash::error(Redirect::to(target), failure))
        }
        Err(other) => Err(other),
    }
}
