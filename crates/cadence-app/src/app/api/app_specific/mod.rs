// Operational endpoints that are not part of the booking resource tree.

use salvo::Router;

use cadence_core::constants::APP_ROUTE_COMPONENT;

mod healthcheck;
mod policy;

#[must_use]
pub fn routes() -> Router {
    Router::with_path(APP_ROUTE_COMPONENT)
        .push(healthcheck::routes())
        .push(policy::routes())
}
