use actix_web::middleware::Next;
use actix_web::{
    body::BoxBody,
    cookie::Cookie,
    dev::{ServiceRequest, ServiceResponse},
    web, Error, HttpMessage,
};
use tracing::{debug, warn};

use crate::api::identity::{IdentityService, OwnerId, AUTH_COOKIE};

pub struct IdentityMiddleware;

impl IdentityMiddleware {
    /// Attach an owner identity to every request. A valid identity
    /// cookie is honored; anything else (first contact, tampering,
    /// expiry) results in a fresh identity and a new cookie on the
    /// response.
    pub async fn assign_owner(
        req: ServiceRequest,
        next: Next<BoxBody>,
    ) -> Result<ServiceResponse<BoxBody>, Error> {
        let Some(identity) = req.app_data::<web::Data<IdentityService>>().cloned() else {
            // No identity service registered (should not happen outside
            // misconfigured tests); pass the request through untouched.
            return next.call(req).await;
        };

        let existing = req
            .cookie(AUTH_COOKIE)
            .and_then(|c| identity.verify_token(c.value()));

        let (owner_id, fresh_token) = match existing {
            Some(owner_id) => (owner_id, None),
            None => {
                let owner_id = identity.new_owner_id();
                let token = identity
                    .generate_token(&owner_id)
                    .map_err(actix_web::error::ErrorInternalServerError)?;
                debug!("Assigned new owner identity: {}", owner_id);
                (owner_id, Some(token))
            }
        };

        req.extensions_mut().insert(OwnerId(owner_id));

        let mut res = next.call(req).await?;

        if let Some(token) = fresh_token {
            let mut cookie = Cookie::new(AUTH_COOKIE, token);
            cookie.set_path("/");
            cookie.set_http_only(true);

            if let Err(e) = res.response_mut().add_cookie(&cookie) {
                warn!("Failed to set identity cookie: {}", e);
            }
        }

        Ok(res)
    }
}
