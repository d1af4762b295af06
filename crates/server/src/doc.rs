use crate::routes::{auth, health, reservation, space};
use utoipa::OpenApi;

/// API Documentation
#[derive(OpenApi)]
#[openapi(
    paths(
        health::health,
        auth::login,
        space::get_spaces,
        space::get_space_by_id,
        reservation::create_reservation,
        reservation::get_reservations,
        reservation::get_reservations_for_requester,
        reservation::apply_workflow_action,
        reservation::cancel_reservation
    ),
    tags(
        (name = "Health", description = "Liveness endpoints"),
        (name = "Auth", description = "Identity resolution endpoints"),
        (name = "Spaces", description = "Bookable space catalog"),
        (name = "Reservations", description = "Reservation requests and the approval workflow"),
    ),
    info(
        title = "Space Reservation API",
        version = "1.0.0",
        description = "School facility reservation portal backend",
        license(
            name = "MIT OR Apache-2.0",
        )
    )
)]
pub struct ApiDoc;
