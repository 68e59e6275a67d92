use actix_web::{web, HttpResponse, Responder};
use std::sync::Arc;
use tracing::{error, trace};

use crate::storage::Storage;

pub struct HealthService;

impl HealthService {
    /// GET `/ping` — storage liveness. Each backend bounds its own
    /// probe (~1 s for the relational pool), so this handler just
    /// reports the outcome.
    pub async fn ping(storage: web::Data<Arc<dyn Storage>>) -> impl Responder {
        trace!("Received ping request");

        match storage.ping().await {
            Ok(()) => HttpResponse::Ok()
                .content_type("text/plain; charset=utf-8")
                .body("OK"),
            Err(e) => {
                error!("Storage ping failed: {}", e);
                HttpResponse::InternalServerError().body("Internal server error")
            }
        }
    }
}
