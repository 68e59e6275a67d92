use actix_web::{web, HttpResponse, Responder};
use std::sync::Arc;
use tracing::{debug, error};

use crate::storage::Storage;

pub struct RedirectService;

impl RedirectService {
    /// GET `/{code}` — 307 to the original URL. A tombstoned record is
    /// reported as 410 Gone, which is why lookups return deleted
    /// records instead of hiding them.
    pub async fn handle_redirect(
        path: web::Path<String>,
        storage: web::Data<Arc<dyn Storage>>,
    ) -> impl Responder {
        let code = path.into_inner();

        match storage.get(&code).await {
            Ok(Some(record)) if record.is_deleted => {
                debug!("Redirect link is gone: {}", code);
                HttpResponse::Gone()
                    .content_type("text/plain; charset=utf-8")
                    .body("Gone")
            }
            Ok(Some(record)) => HttpResponse::TemporaryRedirect()
                .insert_header(("Location", record.original_url))
                .finish(),
            Ok(None) => {
                debug!("Redirect link not found: {}", code);
                HttpResponse::NotFound()
                    .content_type("text/plain; charset=utf-8")
                    .body("Not Found")
            }
            Err(e) => {
                error!("Failed to resolve {}: {}", code, e);
                HttpResponse::InternalServerError().body("Internal server error")
            }
        }
    }
}
