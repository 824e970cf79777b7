use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Industry Day API",
        version = "1.0.0",
        description = "Backend of the Industry Day platform: students, companies, rooms, stalls and the interview queues that connect them.\n\n**Authentication:** guarded endpoints accept a JWT as `Authorization: Bearer <token>` or in the `access_token` cookie set by login.\n\n**Features:**\n- Email/password and Google sign-in\n- Pre-listed and walk-in interview queues per company and stall\n- Announcements, feedback, shortlists and CVs\n- Job post PDFs kept in memory\n- Health monitoring and metrics"
    ),
    paths(
        // Auth
        crate::api::auth::login,
        crate::api::auth::logout,
        crate::api::auth::get_me,

        // Accounts and profiles
        crate::api::users::create_user,
        crate::api::users::list_users,
        crate::api::users::get_user,
        crate::api::students::create_student,
        crate::api::students::list_students,
        crate::api::students::get_my_student,
        crate::api::companies::register_company,
        crate::api::companies::list_companies,
        crate::api::companies::list_company_names,
        crate::api::admins::create_admin,
        crate::api::room_admins::create_room_admin,

        // Venue
        crate::api::rooms::create_room,
        crate::api::rooms::update_room,
        crate::api::stalls::create_stall,

        // Interview queue
        crate::api::interviews::create_interview,
        crate::api::interviews::list_prelisted,
        crate::api::interviews::next_walkins,

        // Content
        crate::api::announcements::create_announcement,
        crate::api::announcements::list_announcements,
        crate::api::feedback::create_feedback,
        crate::api::shortlists::create_shortlist,
        crate::api::cvs::create_by_reg_no,
        crate::api::job_posts::upload_job_post,

        // PDF storage
        crate::api::pdfs::upload_pdf,
        crate::api::pdfs::storage_stats,
        crate::api::pdfs::memory_usage,

        // Health & Metrics
        crate::api::health::health_check,
        crate::api::metrics::get_metrics,
    ),
    components(
        schemas(
            crate::api::MessageResponse,
            crate::api::health::HealthResponse,
            crate::api::metrics::MetricsResponse,
            crate::services::auth_service::LoginRequest,
            crate::services::auth_service::AuthResponse,
            crate::models::UserInfo,
            crate::models::UserRole,
            crate::models::StudentDetails,
            crate::models::CompanyDetails,
            crate::models::InterviewDetails,
            crate::models::CountResponse,
            crate::models::UpdatedResponse,
            crate::models::BulkFailure,
            crate::models::BulkSummary,
            crate::models::PdfInfo,
        )
    ),
    tags(
        (name = "Auth", description = "Email/password login, Google sign-in and the current session."),
        (name = "User", description = "Accounts shared by every role."),
        (name = "Student", description = "Student profiles with their registration number, group and level."),
        (name = "Company", description = "Company profiles, self-registration and bulk import."),
        (name = "Admin", description = "Organiser accounts."),
        (name = "Room", description = "Interview rooms."),
        (name = "Room Admin", description = "Staff assigned to a room."),
        (name = "Stall", description = "Company stalls inside rooms and their group preference."),
        (name = "Interview", description = "Pre-listed and walk-in interview queues, including next walk-in assignment."),
        (name = "Announcement", description = "Announcements for students, companies or everyone."),
        (name = "Feedback", description = "Ratings and comments from participants."),
        (name = "Shortlist", description = "Students shortlisted by companies."),
        (name = "CV", description = "Student CV references."),
        (name = "Job Posts", description = "Job post PDFs uploaded by companies."),
        (name = "PDF Storage", description = "In-memory PDF store."),
        (name = "Health", description = "Health check and system metrics endpoints for monitoring service status."),
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some("JWT returned by /api/auth/login"))
                        .build(),
                ),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openapi_lists_queue_and_security() {
        let doc = ApiDoc::openapi();
        assert!(doc
            .paths
            .paths
            .contains_key("/api/interview/company/{company_id}/stall/{stall_id}/next-walkin"));
        assert!(doc
            .components
            .as_ref()
            .is_some_and(|c| c.security_schemes.contains_key("bearer_auth")));
    }
}
