pub mod identity;
pub mod logging;

pub use identity::IdentityMiddleware;
pub use logging::RequestLog;
