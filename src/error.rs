use std::result;

use rocket::form;
use rocket::http::Status;
use rocket::response::{self, Responder};
use rocket::Request;
use thiserror::Error;

pub type Result<T> = result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("invalid submission: {0}")]
    Validation(String),
    #[error("no matching record")]
    NotFound,
    #[error("method not allowed")]
    MethodNotAllowed,
    #[error("database error: {0}")]
    Persistence(diesel::result::Error),
}

impl Error {
    pub fn status(&self) -> Status {
        match self {
            Error::Validation(_) => Status::BadRequest,
            Error::NotFound => Status::NotFound,
            Error::MethodNotAllowed => Status::MethodNotAllowed,
            Error::Persistence(_) => Status::InternalServerError,
        }
    }
}

impl From<diesel::result::Error> for Error {
    fn from(err: diesel::result::Error) -> Self {
        match err {
            diesel::result::Error::NotFound => Error::NotFound,
            other => Error::Persistence(other),
        }
    }
}

impl<'v> From<form::Errors<'v>> for Error {
    fn from(errors: form::Errors<'v>) -> Self {
        Error::Validation(errors.to_string())
    }
}

/// Whether a request that reached the 404 catcher without being routed would
/// have been served under a different method. Rocket has no notion of 405, so
/// the router's table is consulted directly.
pub fn method_not_allowed(request: &Request<'_>) -> bool {
    if request.route().is_some() {
        return false;
    }

    let segments: Vec<&str> = request.uri().path().segments().collect();

    request
        .rocket()
        .routes()
        .filter(|route| route.method != request.method())
        .any(|route| path_matches(&route.uri.to_string(), &segments))
}

/// Matches request path segments against a route pattern such as
/// `/venues/<id>/edit` or `/static/<path..>`. A query part is ignored.
fn path_matches(pattern: &str, segments: &[&str]) -> bool {
    let path = pattern.split('?').next().unwrap_or_default();
    let mut remaining = segments.iter();

    for expected in path.split('/').filter(|s| !s.is_empty()) {
        if expected.starts_with('<') && expected.ends_with("..>") {
            return true;
        }

        match remaining.next() {
            Some(actual) if expected.starts_with('<') && expected.ends_with('>') => {
                if actual.is_empty() {
                    return false;
                }
            }
            Some(actual) if expected == *actual => {}
            _ => return false,
        }
    }

    remaining.next().is_none()
}

/// Hands the status to the matching catcher, which renders the error page.
impl<'r> Responder<'r, 'static> for Error {
    fn respond_to(self, request: &'r Request<'_>) -> response::Result<'static> {
        match &self {
            Error::Persistence(e) => log::error!("{} {}: database error: {}", request.method(), request.uri(), e),
            other => log::warn!("{} {}: {}", request.method(), request.uri(), other),
        }

        Err(self.status())
    }
}
