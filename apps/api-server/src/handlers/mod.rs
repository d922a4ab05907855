//! HTTP handlers and route configuration.

mod auth;
mod categories;
mod health;
mod posts;
mod tags;
mod users;

use actix_web::web;

/// Configure all application routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1")
            // Public routes
            .route("", web::get().to(health::info))
            .route("/login", web::post().to(auth::login))
            .route("/posts", web::get().to(posts::index))
            .route("/posts/{slug}", web::get().to(posts::show))
            .route("/categories", web::get().to(categories::index))
            .route("/categories/{slug}", web::get().to(categories::show))
            .route("/tags", web::get().to(tags::index))
            .route("/tags/{slug}", web::get().to(tags::show))
            // Authenticated routes
            .route("/me", web::get().to(auth::me))
            .route("/logout", web::post().to(auth::logout))
            .route("/change-password", web::post().to(auth::change_password))
            // Content management (writer/admin)
            .route("/admin/posts", web::get().to(posts::admin_index))
            .route("/posts", web::post().to(posts::store))
            .route("/posts/{id}", web::put().to(posts::update))
            .route("/posts/{id}", web::delete().to(posts::destroy))
            .route("/categories", web::post().to(categories::store))
            .route("/categories/{id}", web::put().to(categories::update))
            .route("/categories/{id}", web::delete().to(categories::destroy))
            // User management (admin)
            .route("/users", web::get().to(users::index))
            .route("/users", web::post().to(users::store))
            .route("/users/{id}", web::put().to(users::update))
            .route("/users/{id}", web::delete().to(users::destroy)),
    );
}
