//! `/api/recurring-bookings` resource tree.

use salvo::Router;

use cadence_core::constants::RECURRING_ROUTE_COMPONENT;

mod booking;
mod exception;
mod occurrence;
mod types;


#[must_use]
pub fn routes() -> Router {
    Router::with_path(RECURRING_ROUTE_COMPONENT)
        .post(booking::create_booking)
        .push(
            Router::with_path("{id}")
                .get(booking::get_booking)
                .push(Router::with_path("pause").post(booking::pause_booking))
                .push(Router::with_path("resume").post(booking::resume_booking))
                .push(Router::with_path("cancel").post(booking::cancel_booking))
                .push(Router::with_path("generate-next").post(booking::generate_next))
                .push(
                    Router::with_path("occurrences")
                        .get(occurrence::preview_occurrences)
                        .push(
                            Router::with_path("materialized")
                                .get(occurrence::list_materialized),
                        ),
                )
                .push(
                    Router::with_path("exceptions")
                        .get(exception::list_exceptions)
                        .push(
                            Router::with_path("{date}")
                                .put(exception::put_exception)
                                .delete(exception::delete_exception),
                        ),
                ),
        )
}
