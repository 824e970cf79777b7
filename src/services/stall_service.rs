use mongodb::bson::{doc, Document};
use std::collections::HashMap;

use crate::database::{collections, MongoDB};
use crate::models::{CreateStallRequest, Stall, StallDetails, UpdateStallRequest};
use crate::services::{company_service, interview_service, room_service};
use crate::utils::{error::AppError, new_id};

async fn with_relations(db: &MongoDB, stalls: Vec<Stall>) -> Result<Vec<StallDetails>, AppError> {
    let room_ids: Vec<String> = stalls.iter().map(|s| s.room_id.clone()).collect();
    let company_ids: Vec<String> = stalls.iter().map(|s| s.company_id.clone()).collect();
    let rooms = room_service::rooms_by_ids(db, &room_ids).await?;
    let companies = company_service::companies_by_ids(db, &company_ids).await?;

    Ok(stalls
        .into_iter()
        .map(|stall| StallDetails {
            room: rooms.get(&stall.room_id).cloned(),
            company: companies.get(&stall.company_id).cloned(),
            stall,
        })
        .collect())
}

async fn list_where(db: &MongoDB, filter: Document) -> Result<Vec<StallDetails>, AppError> {
    let stalls = db
        .find_many(collections::STALLS, filter, Some(doc! { "title": 1 }))
        .await?;
    with_relations(db, stalls).await
}

pub async fn create_stall(db: &MongoDB, request: &CreateStallRequest) -> Result<StallDetails, AppError> {
    room_service::get_room(db, &request.room_id).await?;
    company_service::require_company(db, &request.company_id).await?;

    let stall = Stall {
        stall_id: new_id(),
        title: request.title.trim().to_string(),
        room_id: request.room_id.clone(),
        company_id: request.company_id.clone(),
        preference: request.preference.unwrap_or_default(),
        status: request.status.unwrap_or_default(),
    };

    db.collection::<Stall>(collections::STALLS).insert_one(&stall).await?;
    log::info!(
        "✅ Stall created: {} (room {}, company {})",
        stall.stall_id,
        stall.room_id,
        stall.company_id
    );

    get_stall(db, &stall.stall_id).await
}

pub async fn list_stalls(db: &MongoDB) -> Result<Vec<StallDetails>, AppError> {
    list_where(db, doc! {}).await
}

pub async fn list_by_room(db: &MongoDB, room_id: &str) -> Result<Vec<StallDetails>, AppError> {
    list_where(db, doc! { "roomID": room_id }).await
}

pub async fn list_by_company(db: &MongoDB, company_id: &str) -> Result<Vec<StallDetails>, AppError> {
    list_where(db, doc! { "companyID": company_id }).await
}

pub async fn require_stall(db: &MongoDB, stall_id: &str) -> Result<Stall, AppError> {
    db.find_one(collections::STALLS, doc! { "stallID": stall_id })
        .await?
        .ok_or_else(|| AppError::not_found("Stall", stall_id))
}

pub async fn get_stall(db: &MongoDB, stall_id: &str) -> Result<StallDetails, AppError> {
    let stall = require_stall(db, stall_id).await?;
    with_relations(db, vec![stall])
        .await?
        .pop()
        .ok_or_else(|| AppError::not_found("Stall", stall_id))
}

pub async fn update_stall(
    db: &MongoDB,
    stall_id: &str,
    request: &UpdateStallRequest,
) -> Result<StallDetails, AppError> {
    require_stall(db, stall_id).await?;
    if let Some(room_id) = &request.room_id {
        room_service::get_room(db, room_id).await?;
    }
    if let Some(company_id) = &request.company_id {
        company_service::require_company(db, company_id).await?;
    }

    let set = request.to_set_doc();
    if !set.is_empty() {
        db.collection::<Stall>(collections::STALLS)
            .update_one(doc! { "stallID": stall_id }, doc! { "$set": set })
            .await?;
    }

    get_stall(db, stall_id).await
}

/// Queued walk-ins at the stall go back to the waiting pool before the stall is removed.
pub async fn delete_stall(db: &MongoDB, stall_id: &str) -> Result<String, AppError> {
    require_stall(db, stall_id).await?;
    interview_service::clear_walkins_from_stall(db, stall_id).await?;

    db.collection::<Stall>(collections::STALLS)
        .delete_one(doc! { "stallID": stall_id })
        .await?;

    log::info!("🗑️  Stall deleted: {}", stall_id);
    Ok(format!("Stall with ID {} removed", stall_id))
}

pub async fn stalls_by_ids(db: &MongoDB, ids: &[String]) -> Result<HashMap<String, Stall>, AppError> {
    if ids.is_empty() {
        return Ok(HashMap::new());
    }

    let stalls: Vec<Stall> = db
        .find_many(collections::STALLS, doc! { "stallID": { "$in": ids.to_vec() } }, None)
        .await?;
    Ok(stalls.into_iter().map(|stall| (stall.stall_id.clone(), stall)).collect())
}
