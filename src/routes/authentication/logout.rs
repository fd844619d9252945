use actix_web::HttpResponse;

use crate::session_state::TypedSession;

#[tracing::instrument(
    "Logging out customer",
    skip(session)
)]
pub async fn logout(session: TypedSession) -> HttpResponse {
    session.purge();
    HttpResponse::Ok().body("Successfully logged out")
}
