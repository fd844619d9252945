use actix_web::{error::{ErrorBadRequest, ErrorInternalServerError}, web, HttpResponse};
use serde::{Deserialize, Serialize};

use crate::db_interaction::customers::record_complaint;
use crate::session_state::TypedSession;
use crate::utils::{get_pooled_connection, DbPool};

#[derive(Deserialize, Debug)]
pub struct ContactForm{
    pub message: String
}

#[derive(Serialize)]
pub struct ContactReceipt{
    pub complaint_id: i32
}

// Open to anonymous visitors; a logged-in session just attaches the
// customer to the complaint
#[tracing::instrument(
    "Recording contact message",
    skip(pool, session, form)
)]
pub async fn contact(
    pool: web::Data<DbPool>,
    form: web::Form<ContactForm>,
    session: TypedSession
) -> Result<HttpResponse, actix_web::Error> {
    if form.message.trim().is_empty() {
        return Err(ErrorBadRequest("Message must not be empty"))
    }

    let customer_id = session.get_customer_id().ok().flatten();

    let conn = get_pooled_connection(pool.get_ref())
        .await
        .map_err(ErrorInternalServerError)?;

    let complaint_id = record_complaint(conn, customer_id, form.0.message)
        .await
        .map_err(ErrorInternalServerError)?;

    Ok(HttpResponse::Ok().json(ContactReceipt{complaint_id}))
}
