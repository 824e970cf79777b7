use actix_web::{web, HttpResponse};

use crate::api::deleted;
use crate::database::MongoDB;
use crate::models::{CreateRoomRequest, Room, UpdateRoomRequest};
use crate::services::room_service;
use crate::utils::{error::AppError, validation::Validate};

#[utoipa::path(
    post,
    path = "/api/room",
    tag = "Room",
    request_body = CreateRoomRequest,
    responses((status = 201, description = "Room created", body = Room))
)]
pub async fn create_room(
    db: web::Data<MongoDB>,
    request: web::Json<CreateRoomRequest>,
) -> Result<HttpResponse, AppError> {
    log::info!("📝 POST /room - {}", request.room_name);
    request.validate()?;
    Ok(HttpResponse::Created().json(room_service::create_room(&db, &request).await?))
}

pub async fn list_rooms(db: web::Data<MongoDB>) -> Result<HttpResponse, AppError> {
    log::info!("🔍 GET /room");
    Ok(HttpResponse::Ok().json(room_service::list_rooms(&db).await?))
}

pub async fn get_room(db: web::Data<MongoDB>, path: web::Path<String>) -> Result<HttpResponse, AppError> {
    let room_id = path.into_inner();
    log::info!("🔍 GET /room/{}", room_id);
    Ok(HttpResponse::Ok().json(room_service::get_room(&db, &room_id).await?))
}

#[utoipa::path(
    patch,
    path = "/api/room/{id}",
    tag = "Room",
    params(("id" = String, Path, description = "Room ID")),
    request_body = UpdateRoomRequest,
    responses(
        (status = 200, description = "Room updated, unsupplied fields untouched", body = Room),
        (status = 400, description = "No fields to update"),
        (status = 404, description = "Room not found")
    )
)]
pub async fn update_room(
    db: web::Data<MongoDB>,
    path: web::Path<String>,
    request: web::Json<UpdateRoomRequest>,
) -> Result<HttpResponse, AppError> {
    let room_id = path.into_inner();
    log::info!("✏️  PATCH /room/{}", room_id);
    request.validate()?;
    Ok(HttpResponse::Ok().json(room_service::update_room(&db, &room_id, &request).await?))
}

pub async fn delete_room(db: web::Data<MongoDB>, path: web::Path<String>) -> Result<HttpResponse, AppError> {
    let room_id = path.into_inner();
    log::info!("🗑️  DELETE /room/{}", room_id);
    room_service::delete_room(&db, &room_id).await?;
    Ok(deleted(format!("Room with ID {} deleted", room_id)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{body::to_bytes, http::StatusCode, test, App};

    #[actix_rt::test]
    async fn test_empty_patch_is_bad_request() {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(MongoDB::detached().await))
                .route("/room/{id}", web::patch().to(update_room)),
        )
        .await;

        let req = test::TestRequest::patch()
            .uri("/room/r1")
            .set_json(serde_json::json!({}))
            .to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);

        let body: serde_json::Value = serde_json::from_slice(&to_bytes(res.into_body()).await.unwrap()).unwrap();
        assert_eq!(body["error"], "No fields to update");

        let blank_name = test::TestRequest::patch()
            .uri("/room/r1")
            .set_json(serde_json::json!({ "roomName": "  " }))
            .to_request();
        assert_eq!(test::call_service(&app, blank_name).await.status(), StatusCode::BAD_REQUEST);
    }
}
