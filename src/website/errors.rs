use maud::{html, Markup};
use rocket::http::Status;
use rocket::{Catcher, Request};

use super::{base_html, Page};
use crate::error::{method_not_allowed, Error};

pub fn catchers() -> Vec<Catcher> {
    catchers![bad_request, not_found, method_not_allowed_page, unprocessable, internal_error, fallback]
}

fn error_page(status: Status, heading: &str, detail: &str) -> (Status, Markup) {
    let page = base_html(
        html! {
            div.error {
                h1 { ( status.code ) " " ( heading ) }
                p { ( detail ) }
                a href="/" { "Back to the start page" }
            }
        },
        &Page::Home,
        None,
    );

    (status, page)
}

#[catch(400)]
fn bad_request() -> (Status, Markup) {
    error_page(Status::BadRequest, "Bad Request", "The submitted data could not be understood.")
}

#[catch(404)]
fn not_found(request: &Request<'_>) -> (Status, Markup) {
    if method_not_allowed(request) {
        return method_not_allowed_response(request);
    }

    error_page(Status::NotFound, "Not Found", "There is nothing here.")
}

fn method_not_allowed_response(request: &Request<'_>) -> (Status, Markup) {
    let status = Error::MethodNotAllowed.status();
    let detail = format!("{} is not supported for {}.", request.method(), request.uri().path());

    error_page(status, "Method Not Allowed", &detail)
}

#[catch(405)]
fn method_not_allowed_page(request: &Request<'_>) -> (Status, Markup) {
    method_not_allowed_response(request)
}

// Form handlers turn their own failures into 400s, so only a path parameter
// that fails to parse without a lower ranked route ends up here. It is
// reported as a plain bad request.
#[catch(422)]
fn unprocessable() -> (Status, Markup) {
    bad_request()
}

#[catch(500)]
fn internal_error() -> (Status, Markup) {
    error_page(
        Status::InternalServerError,
        "Internal Server Error",
        "Something went wrong on our end. Please try again later.",
    )
}

#[catch(default)]
fn fallback(status: Status, _request: &Request<'_>) -> (Status, Markup) {
    error_page(status, status.reason().unwrap_or("Error"), "The request could not be completed.")
}
