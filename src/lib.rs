#[macro_use]
extern crate rocket;

pub mod api;
pub mod error;
mod schema;
pub mod store;
pub mod website;

use std::path::PathBuf;

use rocket::fairing::AdHoc;
use rocket::figment::Figment;
use rocket::fs::NamedFile;
use rocket::{Build, Rocket, State};

use store::Store;

/// The application as configured by `Rocket.toml` and `ROCKET_*` variables.
pub fn rocket() -> Rocket<Build> {
    rocket_with(rocket::Config::figment())
}

/// The application on an explicit configuration, e.g. with the database
/// pointed elsewhere.
pub fn rocket_with(figment: Figment) -> Rocket<Build> {
    let rocket = rocket::custom(figment)
        .attach(Store::fairing())
        .attach(assets_fairing())
        .mount("/", routes![static_file]);
    let rocket = api::mount(rocket, "/api");
    website::mount(rocket, "/")
}

fn assets_fairing() -> AdHoc {
    AdHoc::try_on_ignite("Assets Config", |rocket| async move {
        let assets_dir: PathBuf = rocket
            .figment()
            .extract_inner("assets_dir")
            .unwrap_or_else(|_| PathBuf::from("static"));

        if assets_dir.exists() {
            Ok(rocket.manage(AssetsDir(assets_dir)))
        } else {
            log::error!("The assets directory '{}' does not exist.", assets_dir.display());

            Err(rocket)
        }
    })
}

#[derive(Debug)]
struct AssetsDir(PathBuf);

#[get("/static/<file..>")]
async fn static_file(file: PathBuf, assets_dir: &State<AssetsDir>) -> Option<NamedFile> {
    let path = assets_dir.0.join(file);
    NamedFile::open(path).await.ok()
}
