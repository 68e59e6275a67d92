use actix_web::{web, HttpRequest, HttpResponse, Responder};
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, error, warn};

use super::{owner_id, short_url};
use crate::config::Config;
use crate::storage::Storage;
use crate::system::shutdown::ShutdownToken;

#[derive(Debug, Serialize)]
pub struct UserLinkItem {
    pub short_url: String,
    pub original_url: String,
}

pub struct UserLinkService;

impl UserLinkService {
    /// GET `/api/user/urls` — the caller's non-deleted links; 204 when
    /// there are none.
    pub async fn list(
        req: HttpRequest,
        config: web::Data<Config>,
        storage: web::Data<Arc<dyn Storage>>,
    ) -> impl Responder {
        let Some(owner) = owner_id(&req) else {
            return HttpResponse::InternalServerError().body("Internal server error");
        };

        let links = match storage.list_by_owner(&owner).await {
            Ok(links) => links,
            Err(e) => {
                error!("Failed to list links for owner: {}", e);
                return HttpResponse::InternalServerError().body("Internal server error");
            }
        };

        if links.is_empty() {
            return HttpResponse::NoContent().finish();
        }

        let items: Vec<UserLinkItem> = links
            .into_iter()
            .map(|record| UserLinkItem {
                short_url: short_url(&config.server.base_url, &record.code),
                original_url: record.original_url,
            })
            .collect();

        HttpResponse::Ok().json(items)
    }

    /// DELETE `/api/user/urls` — body is a list of codes. Responds 202
    /// immediately; the tombstoning runs as a detached best-effort task
    /// that checks the shutdown token before touching storage and never
    /// reports back to the caller.
    pub async fn delete(
        req: HttpRequest,
        body: web::Json<Vec<String>>,
        storage: web::Data<Arc<dyn Storage>>,
        shutdown: web::Data<ShutdownToken>,
    ) -> impl Responder {
        let Some(owner) = owner_id(&req) else {
            return HttpResponse::InternalServerError().body("Internal server error");
        };

        let codes = body.into_inner();
        if codes.is_empty() {
            return HttpResponse::BadRequest().body("Body must contain at least one short code");
        }

        let storage = storage.get_ref().clone();
        let token = shutdown.get_ref().clone();

        tokio::spawn(async move {
            if token.is_cancelled() {
                warn!(
                    "Abandoning deletion of {} links: shutdown in progress",
                    codes.len()
                );
                return;
            }

            match storage.soft_delete(&codes, &owner).await {
                Ok(()) => debug!("Background deletion of {} links finished", codes.len()),
                Err(e) => error!("Background deletion failed: {}", e),
            }
        });

        HttpResponse::Accepted().finish()
    }
}
