use actix_web::middleware::Next;
use actix_web::{
    body::BoxBody,
    dev::{ServiceRequest, ServiceResponse},
    Error,
};
use std::time::Instant;
use tracing::info;

pub struct RequestLog;

impl RequestLog {
    /// One log line per request: method, path, status, latency.
    pub async fn log(
        req: ServiceRequest,
        next: Next<BoxBody>,
    ) -> Result<ServiceResponse<BoxBody>, Error> {
        let start = Instant::now();
        let method = req.method().to_string();
        let path = req.path().to_string();

        let res = next.call(req).await?;

        info!(
            "{} {} -> {} ({:?})",
            method,
            path,
            res.status().as_u16(),
            start.elapsed()
        );

        Ok(res)
    }
}
