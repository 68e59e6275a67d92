pub mod identity;
pub mod middleware;
pub mod services;

use actix_web::web;

use services::{HealthService, RedirectService, ShortenService, UserLinkService};

/// Route table, shared between `main` and the integration tests. The
/// catch-all `/{code}` redirect registers last so the fixed routes win.
pub fn routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/", web::post().to(ShortenService::create_plain))
        .route("/ping", web::get().to(HealthService::ping))
        .service(
            web::scope("/api")
                .route("/shorten", web::post().to(ShortenService::create_json))
                .route("/shorten/batch", web::post().to(ShortenService::create_batch))
                .route("/user/urls", web::get().to(UserLinkService::list))
                .route("/user/urls", web::delete().to(UserLinkService::delete)),
        )
        .route("/{code}", web::get().to(RedirectService::handle_redirect));
}
