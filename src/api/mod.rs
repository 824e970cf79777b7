pub mod admins;
pub mod announcements;
pub mod auth;
pub mod companies;
pub mod cvs;
pub mod feedback;
pub mod health;
pub mod interviews;
pub mod job_posts;
pub mod metrics;
pub mod pdfs;
pub mod room_admins;
pub mod rooms;
pub mod shortlists;
pub mod stalls;
pub mod students;
pub mod swagger;
pub mod users;

use actix_web::HttpResponse;
use serde::Serialize;

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct MessageResponse {
    pub success: bool,
    pub message: String,
}

/// Body of every successful delete.
pub fn deleted(message: impl Into<String>) -> HttpResponse {
    HttpResponse::Ok().json(MessageResponse {
        success: true,
        message: message.into(),
    })
}
