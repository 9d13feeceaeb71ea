use actix_web::web;

use super::{docs, handlers};

/// Prediction and health routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/predict", web::post().to(handlers::predict))
        .route("/health", web::get().to(handlers::health));
}

/// Interactive documentation; `/` redirects to it
pub fn configure_docs(cfg: &mut web::ServiceConfig) {
    cfg.route("/", web::get().to(docs::index))
        .route("/docs", web::get().to(docs::swagger_ui))
        .route("/openapi.json", web::get().to(docs::openapi));
}

/// All routes, with the documentation surface behind a flag
pub fn configure_with(expose_docs: bool) -> impl FnOnce(&mut web::ServiceConfig) {
    move |cfg| {
        configure(cfg);
        if expose_docs {
            configure_docs(cfg);
        }
    }
}
