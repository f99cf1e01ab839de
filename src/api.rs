use rocket::Route;

mod scores;

pub fn routes() -> Vec<Route> {
    scores::routes()
}
