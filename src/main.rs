use actix_web::middleware::{from_fn, Compress};
use actix_web::{web, App, HttpServer};
use tracing::{error, info};

use shortener::api;
use shortener::api::identity::IdentityService;
use shortener::api::middleware::{IdentityMiddleware, RequestLog};
use shortener::config::Config;
use shortener::storage::StorageFactory;
use shortener::system::logging::init_logging;
use shortener::system::shutdown::{listen_for_shutdown, Shutdown};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenvy::dotenv().ok();

    let config = Config::load();
    let _log_guard = init_logging(&config.logging);

    let storage = match StorageFactory::create(&config).await {
        Ok(storage) => storage,
        Err(e) => {
            error!("Failed to initialize storage: {}", e);
            return Err(std::io::Error::other(e.to_string()));
        }
    };
    info!("Storage backend selected: {}", storage.backend_name());

    let identity = IdentityService::from_config(&config);

    let (shutdown, shutdown_token) = Shutdown::new();
    tokio::spawn(listen_for_shutdown(shutdown));

    let bind_address = format!("{}:{}", config.server.host, config.server.port);
    info!("Starting server at http://{}", bind_address);

    let config_data = web::Data::new(config);
    let storage_data = web::Data::new(storage);
    let identity_data = web::Data::new(identity);
    let token_data = web::Data::new(shutdown_token);

    HttpServer::new(move || {
        App::new()
            .app_data(config_data.clone())
            .app_data(storage_data.clone())
            .app_data(identity_data.clone())
            .app_data(token_data.clone())
            .wrap(from_fn(IdentityMiddleware::assign_owner))
            .wrap(from_fn(RequestLog::log))
            .wrap(Compress::default())
            .configure(api::routes)
    })
    .bind(bind_address)?
    .run()
    .await
}
