use salvo::{Depot, Response, Router, handler, writing::Json};

use crate::config::get_config_from_depot;

/// ## Summary
/// GET /app/policy - Returns the active recurrence expansion policy.
///
/// ## Errors
/// Returns HTTP 500 if the configuration is missing from the depot.
#[handler]
async fn recurrence_policy(depot: &mut Depot, res: &mut Response) {
    match get_config_from_depot(depot) {
        Ok(settings) => res.render(Json(settings.recurrence)),
        Err(err) => err.write_to(res),
    }
}

#[must_use]
pub fn routes() -> Router {
    Router::with_path("policy").get(recurrence_policy)
}
