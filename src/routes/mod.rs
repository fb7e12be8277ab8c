pub mod assistant;
pub mod auth;
pub mod calendar;
pub mod documents;
pub mod files;
pub mod import;
pub mod notify;
pub mod pqrsf;
pub mod requests;
pub mod users;

use axum::Router;
use axum::routing::{delete, get, post, put};

use crate::state::SharedState;

pub fn api_routes() -> Router<SharedState> {
    Router::new()
        // Auth
        .route("/api/auth/register", post(auth::register))
        .route("/api/auth/login", post(auth::login))
        .route("/api/auth/logout", post(auth::logout))
        .route("/api/auth/change-password", post(auth::change_password))
        .route("/api/me", get(auth::me))
        // Account provisioning
        .route("/api/create-user-from-excel", post(users::create_from_excel))
        .route("/api/delete-user", post(users::delete_user))
        .route("/api/delete-all-users", post(users::delete_all_users))
        .route("/api/admin/import", post(import::import))
        .route("/api/admin/users", get(users::list))
        .route(
            "/api/admin/users/{id}",
            get(users::get).put(users::update),
        )
        // Calendar
        .route("/api/calendar", get(calendar::list).post(calendar::create))
        .route("/api/calendar/today", get(calendar::today))
        .route("/api/calendar/upcoming", get(calendar::upcoming))
        .route("/api/calendar/{id}", delete(calendar::delete))
        // Requests
        .route(
            "/api/cesantias",
            post(requests::create_cesantia),
        )
        .route("/api/cesantias/mine", get(requests::my_cesantias))
        .route("/api/solicitudes", post(requests::create_solicitud))
        .route("/api/solicitudes/mine", get(requests::my_solicitudes))
        .route("/api/admin/requests", get(requests::list_all))
        .route("/api/admin/stats", get(requests::stats))
        .route(
            "/api/admin/cesantias/{id}/estado",
            put(requests::decide_cesantia),
        )
        .route(
            "/api/admin/solicitudes/{id}/estado",
            put(requests::decide_solicitud),
        )
        // PQRSF
        .route("/api/pqrsf", post(pqrsf::create))
        .route("/api/admin/pqrsf", get(pqrsf::list))
        // Documents
        .route("/api/documents", get(documents::list))
        .route("/api/admin/documents", post(documents::upload))
        .route("/api/admin/documents/{id}", delete(documents::delete))
        .route("/files/{folder}/{name}", get(files::serve))
        // Integrations
        .route("/api/gemini", post(assistant::chat))
        .route("/api/send-email", post(notify::send_email))
}
