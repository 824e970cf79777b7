use actix_web::http::header::CONTENT_DISPOSITION;
use actix_web::{web, HttpResponse};

use crate::api::deleted;
use crate::models::{MemoryUsage, PdfInfo, StorageStats, UploadPdfRequest};
use crate::services::PdfStorage;
use crate::utils::{error::AppError, validation::Validate};

fn missing(pdf_id: &str) -> AppError {
    AppError::not_found("PDF", pdf_id)
}

#[utoipa::path(
    post,
    path = "/api/pdf",
    tag = "PDF Storage",
    request_body = UploadPdfRequest,
    responses(
        (status = 201, description = "PDF stored in memory", body = PdfInfo),
        (status = 400, description = "Not a PDF, empty, invalid base64 or too large")
    )
)]
pub async fn upload_pdf(
    storage: web::Data<PdfStorage>,
    request: web::Json<UploadPdfRequest>,
) -> Result<HttpResponse, AppError> {
    log::info!("📤 POST /pdf - {}", request.filename);
    request.validate()?;
    Ok(HttpResponse::Created().json(storage.store_upload(&request).await?))
}

pub async fn list_pdfs(storage: web::Data<PdfStorage>) -> HttpResponse {
    log::info!("🔍 GET /pdf");
    HttpResponse::Ok().json(storage.list().await)
}

#[utoipa::path(
    get,
    path = "/api/pdf/stats",
    tag = "PDF Storage",
    responses((status = 200, description = "Storage statistics", body = StorageStats))
)]
pub async fn storage_stats(storage: web::Data<PdfStorage>) -> HttpResponse {
    log::info!("📊 GET /pdf/stats");
    HttpResponse::Ok().json(storage.stats().await)
}

#[utoipa::path(
    get,
    path = "/api/pdf/memory",
    tag = "PDF Storage",
    responses((status = 200, description = "Bytes held by stored files", body = MemoryUsage))
)]
pub async fn memory_usage(storage: web::Data<PdfStorage>) -> HttpResponse {
    log::info!("📊 GET /pdf/memory");
    HttpResponse::Ok().json(storage.memory_usage().await)
}

pub async fn download_pdf(storage: web::Data<PdfStorage>, path: web::Path<String>) -> Result<HttpResponse, AppError> {
    let pdf_id = path.into_inner();
    log::info!("📥 GET /pdf/{}", pdf_id);

    let (info, bytes) = storage.retrieve(&pdf_id).await.ok_or_else(|| missing(&pdf_id))?;
    Ok(HttpResponse::Ok()
        .content_type(info.mimetype.as_str())
        .insert_header((CONTENT_DISPOSITION, format!("inline; filename=\"{}\"", info.filename)))
        .body(bytes))
}

pub async fn pdf_info(storage: web::Data<PdfStorage>, path: web::Path<String>) -> Result<HttpResponse, AppError> {
    let pdf_id = path.into_inner();
    log::info!("🔍 GET /pdf/{}/info", pdf_id);
    let info = storage.info(&pdf_id).await.ok_or_else(|| missing(&pdf_id))?;
    Ok(HttpResponse::Ok().json(info))
}

pub async fn delete_pdf(storage: web::Data<PdfStorage>, path: web::Path<String>) -> Result<HttpResponse, AppError> {
    let pdf_id = path.into_inner();
    log::info!("🗑️  DELETE /pdf/{}", pdf_id);
    if !storage.delete(&pdf_id).await {
        return Err(missing(&pdf_id));
    }
    Ok(deleted(format!("PDF with ID {} deleted", pdf_id)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{http::StatusCode, test, App};
    use base64::Engine;

    fn app_routes(cfg: &mut web::ServiceConfig) {
        cfg.route("/pdf", web::post().to(upload_pdf))
            .route("/pdf/stats", web::get().to(storage_stats))
            .route("/pdf/{id}", web::get().to(download_pdf))
            .route("/pdf/{id}", web::delete().to(delete_pdf));
    }

    #[actix_rt::test]
    async fn test_upload_download_delete() {
        let storage = web::Data::new(PdfStorage::new(1024));
        let app = test::init_service(App::new().app_data(storage.clone()).configure(app_routes)).await;

        let payload = serde_json::json!({
            "filename": "brochure.pdf",
            "data": base64::engine::general_purpose::STANDARD.encode(b"%PDF-1.4 test"),
        });
        let req = test::TestRequest::post().uri("/pdf").set_json(&payload).to_request();
        let info: PdfInfo = test::call_and_read_body_json(&app, req).await;
        assert_eq!(info.filename, "brochure.pdf");
        assert_eq!(info.size, 13);

        let req = test::TestRequest::get().uri(&format!("/pdf/{}", info.id)).to_request();
        let body = test::call_and_read_body(&app, req).await;
        assert_eq!(&body[..], b"%PDF-1.4 test");

        let req = test::TestRequest::delete().uri(&format!("/pdf/{}", info.id)).to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);

        let req = test::TestRequest::get().uri(&format!("/pdf/{}", info.id)).to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::NOT_FOUND);
    }

    #[actix_rt::test]
    async fn test_rejects_other_content_types() {
        let storage = web::Data::new(PdfStorage::new(1024));
        let app = test::init_service(App::new().app_data(storage).configure(app_routes)).await;

        let payload = serde_json::json!({
            "filename": "photo.png",
            "contentType": "image/png",
            "data": base64::engine::general_purpose::STANDARD.encode(b"png"),
        });
        let req = test::TestRequest::post().uri("/pdf").set_json(&payload).to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::BAD_REQUEST);
    }
}
