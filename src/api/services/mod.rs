pub mod health;
pub mod redirect;
pub mod shorten;
pub mod user_links;

pub use health::HealthService;
pub use redirect::RedirectService;
pub use shorten::ShortenService;
pub use user_links::UserLinkService;

use actix_web::{HttpMessage, HttpRequest};

use crate::api::identity::OwnerId;

/// Owner identity placed into request extensions by the identity
/// middleware. `None` only when the middleware is not mounted.
pub(crate) fn owner_id(req: &HttpRequest) -> Option<String> {
    req.extensions().get::<OwnerId>().map(|o| o.0.clone())
}

/// Compose the public short link for a code.
pub(crate) fn short_url(base_url: &str, code: &str) -> String {
    format!("{}/{}", base_url.trim_end_matches('/'), code)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_url_joins_base_and_code() {
        assert_eq!(
            short_url("http://localhost:8080", "abc12345"),
            "http://localhost:8080/abc12345"
        );
        assert_eq!(
            short_url("http://localhost:8080/", "abc12345"),
            "http://localhost:8080/abc12345"
        );
    }
}
