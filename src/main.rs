mod api;
mod config;
mod database;
mod middleware;
mod models;
mod services;
mod utils;

use actix_cors::Cors;
use actix_web::dev::Service;
use actix_web::{guard, middleware::Logger, web, App, HttpServer};
use dotenv::dotenv;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::config::Settings;
use crate::middleware::AuthMiddleware;
use crate::services::PdfStorage;
use crate::utils::error::AppError;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load environment variables
    dotenv().ok();

    // Initialize logger
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let settings = Settings::from_env().map_err(|e| {
        log::error!("❌ Invalid configuration: {}", e);
        std::io::Error::new(std::io::ErrorKind::InvalidInput, e.to_string())
    })?;

    log::info!("🚀 Starting Industry Day API...");
    log::info!("📊 Database: {}", settings.database_name);

    // Initialize MongoDB connection
    let db = database::MongoDB::new(&settings.database_url, &settings.database_name)
        .await
        .map_err(|e| {
            log::error!("❌ Failed to connect to MongoDB: {}", e);
            std::io::Error::new(std::io::ErrorKind::ConnectionRefused, e.to_string())
        })?;
    log::info!("✅ MongoDB connected successfully");

    if settings.google.is_none() {
        log::warn!("⚠️  Google OAuth is not configured, /api/auth/google/* will fail");
    }

    let bind_address = settings.bind_address();
    // Base64 inflates uploads by a third
    let json_limit = settings.pdf_max_bytes * 4 / 3 + 64 * 1024;

    let db_data = web::Data::new(db);
    let settings_data = web::Data::new(settings);
    let pdf_storage = web::Data::new(PdfStorage::new(settings_data.pdf_max_bytes));

    log::info!("🌐 Server starting on {}", bind_address);
    log::info!("📚 Swagger UI available at: http://{}/swagger-ui/", bind_address);
    log::info!("📄 OpenAPI spec at: http://{}/api-docs/openapi.json", bind_address);

    // Start HTTP server
    HttpServer::new(move || {
        let cors = settings_data
            .cors_origins
            .iter()
            .fold(Cors::default(), |cors, origin| cors.allowed_origin(origin))
            .allowed_methods(vec!["GET", "POST", "PATCH", "DELETE", "OPTIONS"])
            .allowed_headers(vec![
                actix_web::http::header::AUTHORIZATION,
                actix_web::http::header::CONTENT_TYPE,
                actix_web::http::header::ACCEPT,
            ])
            .expose_headers(vec![
                actix_web::http::header::CONTENT_TYPE,
                actix_web::http::header::CONTENT_DISPOSITION,
            ])
            .supports_credentials()
            .max_age(3600);

        // Generate OpenAPI specification
        let openapi = api::swagger::ApiDoc::openapi();

        App::new()
            .app_data(db_data.clone())
            .app_data(settings_data.clone())
            .app_data(pdf_storage.clone())
            .app_data(
                web::JsonConfig::default()
                    .limit(json_limit)
                    .error_handler(|err, _| AppError::Validation(err.to_string()).into()),
            )
            .app_data(
                web::QueryConfig::default()
                    .error_handler(|err, _| AppError::Validation(err.to_string()).into()),
            )
            .app_data(
                web::PathConfig::default()
                    .error_handler(|err, _| AppError::Validation(err.to_string()).into()),
            )
            .wrap(cors)
            .wrap(middleware::SecurityHeaders)
            .wrap_fn(|req, srv| {
                api::metrics::increment_request_count();
                srv.call(req)
            })
            .wrap(Logger::default())
            .service(
                SwaggerUi::new("/swagger-ui/{_:.*}")
                    .url("/api-docs/openapi.json", openapi.clone()),
            )
            // Health check
            .route("/health", web::get().to(api::health::health_check))
            // Metrics
            .route("/metrics", web::get().to(api::metrics::get_metrics))
            .service(
                web::scope("/api")
                    .configure(auth_routes)
                    .configure(account_routes)
                    .configure(venue_routes)
                    .configure(interview_routes)
                    .configure(content_routes)
                    .configure(file_routes),
            )
    })
    .bind(bind_address)?
    .run()
    .await
}

fn auth_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/auth")
            .route("/login", web::post().to(api::auth::login))
            .route("/logout", web::post().to(api::auth::logout))
            .route("/google/login", web::get().to(api::auth::google_login))
            .route("/google/redirect", web::get().to(api::auth::google_redirect))
            .service(
                web::resource("/me")
                    .wrap(AuthMiddleware)
                    .route(web::get().to(api::auth::get_me)),
            ),
    );
}

fn account_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/user")
            .route("", web::post().to(api::users::create_user))
            .route("", web::get().to(api::users::list_users))
            .route("/{id}", web::get().to(api::users::get_user)),
    )
    .service(
        web::scope("/student")
            .route("", web::post().to(api::students::create_student))
            .route("", web::get().to(api::students::list_students))
            .route("/filter", web::get().to(api::students::filter_students))
            .service(
                web::resource("/by-user")
                    .wrap(AuthMiddleware)
                    .route(web::get().to(api::students::get_my_student)),
            )
            .route("/by-user/{user_id}", web::get().to(api::students::get_by_user))
            .route("/by-regno/{reg_no}", web::get().to(api::students::get_by_reg_no))
            .route("/{id}", web::get().to(api::students::get_student))
            .route("/{id}", web::patch().to(api::students::update_student))
            .route("/{id}", web::delete().to(api::students::delete_student)),
    )
    // Self-registration stays public, everything else under /company is guarded
    .route("/company/register", web::post().to(api::companies::register_company))
    .service(
        web::scope("/company")
            .wrap(AuthMiddleware)
            .route("", web::post().to(api::companies::create_company))
            .route("", web::get().to(api::companies::list_companies))
            .route("/bulk", web::post().to(api::companies::bulk_create_companies))
            .route("/filter", web::get().to(api::companies::filter_companies))
            .route("/name", web::get().to(api::companies::list_company_names))
            .route("/by-user", web::get().to(api::companies::get_my_company))
            .route("/by-user/{user_id}", web::get().to(api::companies::get_by_user))
            .route("/{id}", web::get().to(api::companies::get_company))
            .route("/{id}", web::patch().to(api::companies::update_company))
            .route("/{id}", web::delete().to(api::companies::delete_company)),
    )
    .service(
        web::scope("/admin")
            .wrap(AuthMiddleware)
            .route("", web::post().to(api::admins::create_admin))
            .route("", web::get().to(api::admins::list_admins))
            .route("/by-user", web::get().to(api::admins::get_my_admin))
            .route("/profile", web::get().to(api::admins::get_my_admin))
            .route("/{id}", web::get().to(api::admins::get_admin))
            .route("/{id}", web::patch().to(api::admins::update_admin))
            .route("/{id}", web::delete().to(api::admins::delete_admin)),
    )
    .service(
        web::scope("/room-admin")
            .route("", web::post().to(api::room_admins::create_room_admin))
            .route("", web::get().to(api::room_admins::list_room_admins))
            .service(
                web::resource("/by-user")
                    .wrap(AuthMiddleware)
                    .route(web::get().to(api::room_admins::get_my_room_admin)),
            )
            .route("/by-user/{user_id}", web::get().to(api::room_admins::get_by_user))
            .route("/by-room/{room_id}", web::get().to(api::room_admins::list_by_room))
            .route("/{id}", web::get().to(api::room_admins::get_room_admin))
            .route("/{id}", web::patch().to(api::room_admins::update_room_admin))
            .route("/{id}", web::delete().to(api::room_admins::delete_room_admin)),
    );
}

fn venue_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/room")
            .route("", web::post().to(api::rooms::create_room))
            .route("", web::get().to(api::rooms::list_rooms))
            .route("/{id}", web::get().to(api::rooms::get_room))
            .route("/{id}", web::patch().to(api::rooms::update_room))
            .route("/{id}", web::delete().to(api::rooms::delete_room)),
    )
    .service(
        web::scope("/stall")
            .route("", web::post().to(api::stalls::create_stall))
            .route("", web::get().to(api::stalls::list_stalls))
            .route("/room/{room_id}", web::get().to(api::stalls::list_by_room))
            .route("/company/{company_id}", web::get().to(api::stalls::list_by_company))
            .route("/{id}", web::get().to(api::stalls::get_stall))
            .route("/{id}", web::patch().to(api::stalls::update_stall))
            .route("/{id}", web::delete().to(api::stalls::delete_stall)),
    );
}

fn interview_routes(cfg: &mut web::ServiceConfig) {
    use api::interviews as iv;

    cfg.service(
        web::scope("/interview")
            .route("", web::post().to(iv::create_interview))
            .route("", web::get().to(iv::list_interviews))
            .route("/bulk", web::post().to(iv::bulk_create))
            .route("/prelist/bulk", web::post().to(iv::bulk_create_prelist))
            .route("/by-regno", web::post().to(iv::create_by_reg_no))
            .route("/student/{id}", web::get().to(iv::list_by_student))
            .route("/company/{id}", web::get().to(iv::list_by_company))
            .route("/company/{id}/prelisted", web::get().to(iv::list_prelisted))
            .route("/company/{id}/prelisted/inqueue", web::get().to(iv::list_prelisted_in_queue))
            .route("/company/{id}/walkin", web::get().to(iv::list_walkins))
            .route("/company/{id}/walkin/count", web::get().to(iv::count_waiting_walkins))
            .route(
                "/company/{company_id}/stall/{stall_id}/next-walkin",
                web::get().to(iv::next_walkins),
            )
            .route("/stall/{id}", web::get().to(iv::list_in_queue_by_stall))
            .route("/stall/{id}/inqueue", web::get().to(iv::list_in_queue_by_stall))
            .route("/stall/{id}/walkin/count", web::get().to(iv::count_walkins_at_stall))
            .route("/stall/{id}/clear-walkins", web::patch().to(iv::clear_walkins))
            .route("/prelisted/{id}", web::delete().to(iv::delete_prelisted))
            .route("/{id}", web::get().to(iv::get_interview))
            .route("/{id}", web::patch().to(iv::update_interview))
            .route("/{id}", web::delete().to(iv::delete_interview))
            .route("/{id}/schedule", web::patch().to(iv::schedule))
            .route("/{id}/complete", web::patch().to(iv::complete))
            .route("/{id}/cancel", web::patch().to(iv::cancel))
            .route("/{id}/student-preference", web::patch().to(iv::set_student_preference)),
    );
}

fn content_routes(cfg: &mut web::ServiceConfig) {
    use api::announcements as an;

    cfg.service(
        web::scope("/announcement")
            .service(
                web::resource("")
                    .guard(guard::Post())
                    .wrap(AuthMiddleware)
                    .route(web::post().to(an::create_announcement)),
            )
            .route("", web::get().to(an::list_announcements))
            .route("/students", web::get().to(an::list_for_students))
            .route("/companies", web::get().to(an::list_for_companies))
            .route("/count", web::get().to(an::count_announcements))
            .service(
                web::resource("/user")
                    .wrap(AuthMiddleware)
                    .route(web::get().to(an::list_mine)),
            )
            .route("/user/{user_id}", web::get().to(an::list_by_user))
            .service(
                web::resource("/{id}")
                    .guard(guard::Any(guard::Patch()).or(guard::Delete()))
                    .wrap(AuthMiddleware)
                    .route(web::patch().to(an::update_announcement))
                    .route(web::delete().to(an::delete_announcement)),
            )
            .route("/{id}", web::get().to(an::get_announcement)),
    )
    .service(
        web::scope("/feedback")
            .wrap(AuthMiddleware)
            .route("", web::post().to(api::feedback::create_feedback))
            .route("", web::get().to(api::feedback::list_feedback))
            .route("/students", web::get().to(api::feedback::list_from_students))
            .route("/companies", web::get().to(api::feedback::list_from_companies))
            .route("/{id}", web::get().to(api::feedback::get_feedback))
            .route("/{id}", web::patch().to(api::feedback::update_feedback))
            .route("/{id}", web::delete().to(api::feedback::delete_feedback)),
    )
    .service(
        web::scope("/shortlist")
            .wrap(AuthMiddleware)
            .route("", web::post().to(api::shortlists::create_shortlist))
            .route("", web::get().to(api::shortlists::list_shortlists))
            .route("/student/{id}", web::get().to(api::shortlists::list_by_student))
            .route("/company/{id}", web::get().to(api::shortlists::list_by_company))
            .route("/{id}", web::get().to(api::shortlists::get_shortlist))
            .route("/{id}", web::patch().to(api::shortlists::update_shortlist))
            .route("/{id}", web::delete().to(api::shortlists::delete_shortlist)),
    );
}

fn file_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/job-posts")
            .route("/upload", web::post().to(api::job_posts::upload_job_post))
            .route("", web::get().to(api::job_posts::list_job_posts))
            .route("/company/{id}", web::get().to(api::job_posts::list_by_company))
            .route("/{id}", web::get().to(api::job_posts::get_job_post))
            .route("/{id}/download", web::get().to(api::job_posts::download_job_post))
            .route("/{id}", web::delete().to(api::job_posts::delete_job_post)),
    )
    .service(
        web::scope("/cv")
            .route("", web::post().to(api::cvs::create_cv))
            .route("", web::get().to(api::cvs::list_cvs))
            .route("/by-regno", web::post().to(api::cvs::create_by_reg_no))
            .route("/student/{id}", web::get().to(api::cvs::latest_for_student))
            .route("/student/{id}/list", web::get().to(api::cvs::list_for_student))
            .route("/{id}", web::get().to(api::cvs::get_cv))
            .route("/{id}", web::patch().to(api::cvs::update_cv))
            .route("/{id}", web::delete().to(api::cvs::delete_cv)),
    )
    .service(
        web::scope("/pdf")
            .route("", web::post().to(api::pdfs::upload_pdf))
            .route("", web::get().to(api::pdfs::list_pdfs))
            .route("/stats", web::get().to(api::pdfs::storage_stats))
            .route("/memory", web::get().to(api::pdfs::memory_usage))
            .route("/{id}", web::get().to(api::pdfs::download_pdf))
            .route("/{id}/info", web::get().to(api::pdfs::pdf_info))
            .route("/{id}", web::delete().to(api::pdfs::delete_pdf)),
    );
}
