use actix_web::http::StatusCode;
use actix_web::{web, HttpRequest, HttpResponse, Responder};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::error;

use super::{owner_id, short_url};
use crate::config::Config;
use crate::short;
use crate::storage::{BatchItem, Storage};
use crate::utils::validate_url;

#[derive(Debug, Deserialize)]
pub struct ShortenRequest {
    pub url: String,
}

#[derive(Debug, Serialize)]
pub struct ShortenResponse {
    pub result: String,
}

#[derive(Debug, Deserialize)]
pub struct BatchRequestItem {
    pub correlation_id: String,
    pub original_url: String,
}

#[derive(Debug, Serialize)]
pub struct BatchResponseItem {
    pub correlation_id: String,
    pub short_url: String,
}

pub struct ShortenService;

impl ShortenService {
    /// POST `/` — the request body is the URL itself, as text.
    pub async fn create_plain(
        req: HttpRequest,
        body: web::Bytes,
        config: web::Data<Config>,
        storage: web::Data<Arc<dyn Storage>>,
    ) -> impl Responder {
        let Some(owner) = owner_id(&req) else {
            return HttpResponse::InternalServerError().body("Internal server error");
        };

        let url = match String::from_utf8(body.to_vec()) {
            Ok(url) => url.trim().to_string(),
            Err(_) => {
                return HttpResponse::BadRequest().body("Request body is not valid UTF-8");
            }
        };

        match Self::store(&url, &owner, &storage).await {
            Ok((status, code)) => HttpResponse::build(status)
                .content_type("text/plain; charset=utf-8")
                .body(short_url(&config.server.base_url, &code)),
            Err(response) => response,
        }
    }

    /// POST `/api/shorten` — JSON body `{"url": ...}`.
    pub async fn create_json(
        req: HttpRequest,
        body: web::Json<ShortenRequest>,
        config: web::Data<Config>,
        storage: web::Data<Arc<dyn Storage>>,
    ) -> impl Responder {
        let Some(owner) = owner_id(&req) else {
            return HttpResponse::InternalServerError().body("Internal server error");
        };

        match Self::store(&body.url, &owner, &storage).await {
            Ok((status, code)) => HttpResponse::build(status).json(ShortenResponse {
                result: short_url(&config.server.base_url, &code),
            }),
            Err(response) => response,
        }
    }

    /// POST `/api/shorten/batch` — all items are persisted as one unit.
    pub async fn create_batch(
        req: HttpRequest,
        body: web::Json<Vec<BatchRequestItem>>,
        config: web::Data<Config>,
        storage: web::Data<Arc<dyn Storage>>,
    ) -> impl Responder {
        let Some(owner) = owner_id(&req) else {
            return HttpResponse::InternalServerError().body("Internal server error");
        };

        let items = body.into_inner();
        if items.is_empty() {
            return HttpResponse::BadRequest().body("Batch must contain at least one URL");
        }

        let mut batch = Vec::with_capacity(items.len());
        for item in &items {
            if let Err(e) = validate_url(&item.original_url) {
                return HttpResponse::BadRequest().body(format!(
                    "Invalid URL for correlation_id {}: {}",
                    item.correlation_id, e
                ));
            }

            batch.push(BatchItem {
                correlation_id: item.correlation_id.clone(),
                code: short::code(item.original_url.as_bytes()),
                original_url: item.original_url.clone(),
            });
        }

        if let Err(e) = storage.put_batch(&batch, &owner).await {
            error!("Failed to store URL batch: {}", e);
            return HttpResponse::InternalServerError().body("Internal server error");
        }

        let response: Vec<BatchResponseItem> = batch
            .into_iter()
            .map(|item| BatchResponseItem {
                correlation_id: item.correlation_id,
                short_url: short_url(&config.server.base_url, &item.code),
            })
            .collect();

        HttpResponse::Created().json(response)
    }

    /// Shared insert path. A Conflict is resolved by re-deriving the
    /// code — deterministic derivation guarantees it equals the stored
    /// one — and reporting 409 with the same body shape as a fresh 201.
    async fn store(
        url: &str,
        owner: &str,
        storage: &web::Data<Arc<dyn Storage>>,
    ) -> Result<(StatusCode, String), HttpResponse> {
        if let Err(e) = validate_url(url) {
            return Err(HttpResponse::BadRequest().body(format!("Invalid URL: {}", e)));
        }

        let code = short::code(url.as_bytes());

        match storage.put(&code, url, owner).await {
            Ok(()) => Ok((StatusCode::CREATED, code)),
            Err(e) if e.is_conflict() => Ok((StatusCode::CONFLICT, code)),
            Err(e) => {
                error!("Failed to store URL: {}", e);
                Err(HttpResponse::InternalServerError().body("Internal server error"))
            }
        }
    }
}
