#[rocket::launch]
fn rocket() -> _ {
    fyyur::rocket()
}
