pub mod admin_service;
pub mod announcement_service;
pub mod auth_service;
pub mod company_service;
pub mod cv_service;
pub mod feedback_service;
pub mod interview_service;
pub mod job_post_service;
pub mod pdf_storage;
pub mod room_service;
pub mod shortlist_service;
pub mod stall_service;
pub mod student_service;
pub mod user_service;

pub use pdf_storage::PdfStorage;
