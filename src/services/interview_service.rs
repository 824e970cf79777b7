use mongodb::bson::{doc, Document};

use crate::database::{collections, MongoDB};
use crate::models::{
    parse_items, BulkResult, CreateInterviewByRegNoRequest, CreateInterviewRequest, Interview,
    InterviewDetails, InterviewStatus, InterviewType, StallPreference, Student, StudentGroup,
    StudentLevel, UpdateInterviewRequest, DEFAULT_PREFERENCE,
};
use crate::services::{company_service, stall_service, student_service};
use crate::utils::{error::AppError, new_id, now_millis};

pub const INTERVIEW_EXISTS: &str = "An interview already exists for this student and company";

fn prelisted_order() -> Document {
    doc! { "student_preference": 1, "company_preference": 1, "created_at": 1 }
}

fn arrival_order() -> Document {
    doc! { "created_at": 1 }
}

/// What the walk-in ranking needs to know about a waiting interview.
#[derive(Debug, Clone)]
pub struct WalkinCandidate {
    pub interview_id: String,
    pub created_at: i64,
    pub group: Option<StudentGroup>,
    pub level: Option<StudentLevel>,
}

/// Orders walk-ins for a stall: students in the stall's preferred stream first,
/// then senior students, then earliest arrivals.
pub fn rank_walkins(candidates: &mut [WalkinCandidate], preference: StallPreference) {
    let favoured = |c: &WalkinCandidate| c.group.map(|g| preference.favours(g)).unwrap_or(false);

    candidates.sort_by(|a, b| {
        favoured(b)
            .cmp(&favoured(a))
            .then_with(|| b.level.cmp(&a.level))
            .then_with(|| a.created_at.cmp(&b.created_at))
            .then_with(|| a.interview_id.cmp(&b.interview_id))
    });
}

/// Given pre-listed interviews in queue order, the `(interviewID, preference)` pairs
/// that must change so preferences read 1..n.
pub fn renumber_plan(interviews: &[Interview]) -> Vec<(String, i32)> {
    interviews
        .iter()
        .zip(1..)
        .filter(|(interview, position)| interview.company_preference != *position)
        .map(|(interview, position)| (interview.interview_id.clone(), position))
        .collect()
}

async fn populate(db: &MongoDB, interviews: Vec<Interview>) -> Result<Vec<InterviewDetails>, AppError> {
    let student_ids: Vec<String> = interviews.iter().map(|i| i.student_id.clone()).collect();
    let stall_ids: Vec<String> = interviews.iter().filter_map(|i| i.stall_id.clone()).collect();
    let company_ids: Vec<String> = interviews.iter().map(|i| i.company_id.clone()).collect();

    let students = student_service::students_by_ids(db, &student_ids).await?;
    let stalls = stall_service::stalls_by_ids(db, &stall_ids).await?;
    let companies = company_service::companies_by_ids(db, &company_ids).await?;

    Ok(interviews
        .into_iter()
        .map(|interview| InterviewDetails {
            student: students.get(&interview.student_id).cloned(),
            stall: interview.stall_id.as_ref().and_then(|id| stalls.get(id).cloned()),
            company: companies.get(&interview.company_id).cloned(),
            interview,
        })
        .collect())
}

async fn list_where(db: &MongoDB, filter: Document, sort: Document) -> Result<Vec<InterviewDetails>, AppError> {
    let interviews = db
        .find_many(collections::INTERVIEWS, filter, Some(sort))
        .await?;
    populate(db, interviews).await
}

async fn require_interview(db: &MongoDB, interview_id: &str) -> Result<Interview, AppError> {
    db.find_one(collections::INTERVIEWS, doc! { "interviewID": interview_id })
        .await?
        .ok_or_else(|| AppError::not_found("Interview", interview_id))
}

pub async fn get_interview(db: &MongoDB, interview_id: &str) -> Result<InterviewDetails, AppError> {
    let interview = require_interview(db, interview_id).await?;
    populate(db, vec![interview])
        .await?
        .pop()
        .ok_or_else(|| AppError::not_found("Interview", interview_id))
}

fn prelisted_filter(company_id: &str) -> Document {
    doc! { "companyID": company_id, "type": InterviewType::PreListed.as_str() }
}

/// Highest assigned company preference among the company's pre-listed interviews, plus one.
async fn next_company_preference(db: &MongoDB, company_id: &str) -> Result<i32, AppError> {
    let mut filter = prelisted_filter(company_id);
    filter.insert("company_preference", doc! { "$lt": DEFAULT_PREFERENCE });

    let last = db
        .collection::<Interview>(collections::INTERVIEWS)
        .find_one(filter)
        .sort(doc! { "company_preference": -1 })
        .await?;

    Ok(last.map(|i| i.company_preference + 1).unwrap_or(1))
}

// ==================== CREATE ====================

/// Pre-listed interviews join the company queue at the end with status in_queue;
/// walk-ins wait unassigned with status scheduled.
pub async fn create_interview(db: &MongoDB, request: &CreateInterviewRequest) -> Result<InterviewDetails, AppError> {
    student_service::find_student(db, &request.student_id)
        .await?
        .ok_or_else(|| AppError::not_found("Student", &request.student_id))?;
    company_service::require_company(db, &request.company_id).await?;
    if let Some(stall_id) = &request.stall_id {
        stall_service::require_stall(db, stall_id).await?;
    }

    let company_preference = match (request.company_preference, request.interview_type) {
        (Some(preference), _) => preference,
        (None, InterviewType::PreListed) => next_company_preference(db, &request.company_id).await?,
        (None, InterviewType::WalkIn) => DEFAULT_PREFERENCE,
    };

    let interview = Interview {
        interview_id: new_id(),
        stall_id: request.stall_id.clone(),
        company_id: request.company_id.clone(),
        student_id: request.student_id.clone(),
        interview_type: request.interview_type,
        status: request
            .status
            .unwrap_or_else(|| request.interview_type.initial_status()),
        remark: request.remark.clone(),
        student_preference: request.student_preference.unwrap_or(DEFAULT_PREFERENCE),
        company_preference,
        created_at: now_millis(),
    };

    db.collection::<Interview>(collections::INTERVIEWS)
        .insert_one(&interview)
        .await
        .map_err(|e| AppError::from_write(e, INTERVIEW_EXISTS))?;

    log::info!(
        "✅ Interview created: {} ({}, student {}, company {})",
        interview.interview_id,
        interview.interview_type.as_str(),
        interview.student_id,
        interview.company_id
    );
    get_interview(db, &interview.interview_id).await
}

pub async fn create_by_reg_no(
    db: &MongoDB,
    request: &CreateInterviewByRegNoRequest,
) -> Result<InterviewDetails, AppError> {
    let student = student_service::find_by_reg_no(db, &request.reg_no)
        .await?
        .ok_or_else(|| {
            AppError::NotFound(format!(
                "Student with registration number {} not found",
                request.reg_no
            ))
        })?;

    let create = CreateInterviewRequest {
        stall_id: None,
        company_id: request.company_id.clone(),
        student_id: student.student_id,
        interview_type: request.interview_type,
        status: None,
        remark: request.remark.clone(),
        student_preference: None,
        company_preference: None,
    };
    create_interview(db, &create).await
}

async fn create_each(
    db: &MongoDB,
    requests: Vec<Result<CreateInterviewRequest, AppError>>,
) -> BulkResult<InterviewDetails> {
    let mut result = BulkResult::with_capacity(requests.len());

    for (index, request) in requests.into_iter().enumerate() {
        let outcome = match request {
            Ok(request) => create_interview(db, &request).await,
            Err(e) => Err(e),
        };
        result.record(index, outcome);
    }

    log::info!(
        "📦 Bulk interview import: {} ok, {} failed",
        result.summary.successful,
        result.summary.failed
    );
    result
}

pub async fn bulk_create(db: &MongoDB, items: Vec<serde_json::Value>) -> BulkResult<InterviewDetails> {
    create_each(db, parse_items(items)).await
}

fn as_prelisted(mut request: CreateInterviewRequest) -> CreateInterviewRequest {
    request.interview_type = InterviewType::PreListed;
    request.stall_id = None;
    request.status = None;
    request.company_preference = None;
    request
}

/// Compacts each company's queue first so new entries are appended after 1..n,
/// in the order they appear in the batch.
pub async fn bulk_create_prelist(
    db: &MongoDB,
    items: Vec<serde_json::Value>,
) -> Result<BulkResult<InterviewDetails>, AppError> {
    let requests: Vec<Result<CreateInterviewRequest, AppError>> = parse_items(items)
        .into_iter()
        .map(|request| request.map(as_prelisted))
        .collect();

    let mut company_ids: Vec<&str> = requests
        .iter()
        .filter_map(|request| request.as_ref().ok())
        .map(|request| request.company_id.as_str())
        .collect();
    company_ids.sort_unstable();
    company_ids.dedup();
    for company_id in company_ids {
        renumber_company_preferences(db, company_id).await?;
    }

    Ok(create_each(db, requests).await)
}

// ==================== QUERIES ====================

pub async fn list_interviews(db: &MongoDB) -> Result<Vec<InterviewDetails>, AppError> {
    list_where(db, doc! {}, doc! { "created_at": -1 }).await
}

pub async fn list_by_student(db: &MongoDB, student_id: &str) -> Result<Vec<InterviewDetails>, AppError> {
    list_where(db, doc! { "studentID": student_id }, arrival_order()).await
}

pub async fn list_by_company(db: &MongoDB, company_id: &str) -> Result<Vec<InterviewDetails>, AppError> {
    list_where(db, doc! { "companyID": company_id }, arrival_order()).await
}

pub async fn list_prelisted_by_company(db: &MongoDB, company_id: &str) -> Result<Vec<InterviewDetails>, AppError> {
    list_where(db, prelisted_filter(company_id), prelisted_order()).await
}

pub async fn list_prelisted_in_queue_by_company(
    db: &MongoDB,
    company_id: &str,
) -> Result<Vec<InterviewDetails>, AppError> {
    let mut filter = prelisted_filter(company_id);
    filter.insert("status", InterviewStatus::InQueue.as_str());
    list_where(db, filter, prelisted_order()).await
}

pub async fn list_walkins_by_company(db: &MongoDB, company_id: &str) -> Result<Vec<InterviewDetails>, AppError> {
    let filter = doc! { "companyID": company_id, "type": InterviewType::WalkIn.as_str() };
    list_where(db, filter, arrival_order()).await
}

fn waiting_walkins_filter(company_id: &str) -> Document {
    doc! {
        "companyID": company_id,
        "type": InterviewType::WalkIn.as_str(),
        "status": InterviewStatus::Scheduled.as_str(),
        "stallID": null,
    }
}

/// Walk-ins still waiting for a stall.
pub async fn count_waiting_walkins(db: &MongoDB, company_id: &str) -> Result<u64, AppError> {
    db.count(collections::INTERVIEWS, waiting_walkins_filter(company_id)).await
}

pub async fn list_in_queue_by_stall(db: &MongoDB, stall_id: &str) -> Result<Vec<InterviewDetails>, AppError> {
    let filter = doc! { "stallID": stall_id, "status": InterviewStatus::InQueue.as_str() };
    list_where(db, filter, arrival_order()).await
}

pub async fn count_walkins_at_stall(db: &MongoDB, stall_id: &str) -> Result<u64, AppError> {
    let filter = doc! {
        "stallID": stall_id,
        "type": InterviewType::WalkIn.as_str(),
        "status": InterviewStatus::InQueue.as_str(),
    };
    db.count(collections::INTERVIEWS, filter).await
}

// ==================== QUEUE OPERATIONS ====================

/// Assigns up to `count` waiting walk-ins of the company to the stall, best ranked first.
/// Each claim only succeeds while the interview is still unassigned.
pub async fn assign_next_walkins(
    db: &MongoDB,
    company_id: &str,
    stall_id: &str,
    count: usize,
) -> Result<Vec<InterviewDetails>, AppError> {
    if count == 0 {
        return Err(AppError::Validation("count must be at least 1".to_string()));
    }
    let stall = stall_service::require_stall(db, stall_id).await?;

    let waiting: Vec<Interview> = db
        .find_many(collections::INTERVIEWS, waiting_walkins_filter(company_id), None)
        .await?;
    if waiting.is_empty() {
        return Ok(Vec::new());
    }

    let student_ids: Vec<String> = waiting.iter().map(|i| i.student_id.clone()).collect();
    let students = student_service::students_by_ids(db, &student_ids).await?;

    let mut candidates: Vec<WalkinCandidate> = waiting
        .iter()
        .map(|interview| {
            let student: Option<&Student> = students.get(&interview.student_id).map(|d| &d.student);
            WalkinCandidate {
                interview_id: interview.interview_id.clone(),
                created_at: interview.created_at,
                group: student.map(|s| s.group),
                level: student.map(|s| s.level),
            }
        })
        .collect();
    rank_walkins(&mut candidates, stall.preference);

    let collection = db.collection::<Interview>(collections::INTERVIEWS);
    let mut claimed = Vec::with_capacity(count);
    for candidate in candidates {
        if claimed.len() == count {
            break;
        }

        let result = collection
            .update_one(
                doc! {
                    "interviewID": &candidate.interview_id,
                    "status": InterviewStatus::Scheduled.as_str(),
                    "stallID": null,
                },
                doc! { "$set": {
                    "status": InterviewStatus::InQueue.as_str(),
                    "stallID": stall_id,
                } },
            )
            .await?;

        if result.modified_count == 1 {
            claimed.push(candidate.interview_id);
        }
    }

    log::info!(
        "🎯 Stall {} pulled {} walk-in(s) for company {}",
        stall_id,
        claimed.len(),
        company_id
    );

    let mut assigned = list_where(
        db,
        doc! { "interviewID": { "$in": claimed.clone() } },
        arrival_order(),
    )
    .await?;
    assigned.sort_by_key(|details| {
        claimed
            .iter()
            .position(|id| *id == details.interview.interview_id)
            .unwrap_or(usize::MAX)
    });
    Ok(assigned)
}

/// Sends the stall's queued walk-ins back to the waiting pool.
pub async fn clear_walkins_from_stall(db: &MongoDB, stall_id: &str) -> Result<u64, AppError> {
    let result = db
        .collection::<Interview>(collections::INTERVIEWS)
        .update_many(
            doc! {
                "stallID": stall_id,
                "type": InterviewType::WalkIn.as_str(),
                "status": InterviewStatus::InQueue.as_str(),
            },
            doc! { "$set": {
                "stallID": null,
                "status": InterviewStatus::Scheduled.as_str(),
            } },
        )
        .await?;

    log::info!("🧹 Cleared {} walk-in(s) from stall {}", result.modified_count, stall_id);
    Ok(result.modified_count)
}

/// Rewrites the company's pre-listed preferences to 1..n keeping the queue order.
pub async fn renumber_company_preferences(db: &MongoDB, company_id: &str) -> Result<usize, AppError> {
    let interviews: Vec<Interview> = db
        .find_many(
            collections::INTERVIEWS,
            prelisted_filter(company_id),
            Some(doc! { "company_preference": 1, "created_at": 1 }),
        )
        .await?;

    let plan = renumber_plan(&interviews);
    let collection = db.collection::<Interview>(collections::INTERVIEWS);
    for (interview_id, preference) in &plan {
        collection
            .update_one(
                doc! { "interviewID": interview_id },
                doc! { "$set": { "company_preference": *preference } },
            )
            .await?;
    }

    if !plan.is_empty() {
        log::info!("🔢 Renumbered {} pre-listed interview(s) for company {}", plan.len(), company_id);
    }
    Ok(plan.len())
}

// ==================== UPDATES ====================

/// Applies the supplied fields. A new student or company must exist, and an interview
/// turned pre-listed without an explicit company preference joins the end of the queue.
pub async fn update_interview(
    db: &MongoDB,
    interview_id: &str,
    request: &UpdateInterviewRequest,
) -> Result<InterviewDetails, AppError> {
    let current = require_interview(db, interview_id).await?;
    if let Some(student_id) = &request.student_id {
        student_service::find_student(db, student_id)
            .await?
            .ok_or_else(|| AppError::not_found("Student", student_id))?;
    }
    if let Some(company_id) = &request.company_id {
        company_service::require_company(db, company_id).await?;
    }
    if let Some(Some(stall_id)) = &request.stall_id {
        stall_service::require_stall(db, stall_id).await?;
    }

    let mut set = request.to_set_doc();
    let becomes_prelisted = request.interview_type == Some(InterviewType::PreListed)
        && current.interview_type != InterviewType::PreListed;
    if becomes_prelisted && request.company_preference.is_none() {
        let company_id = request.company_id.as_deref().unwrap_or(&current.company_id);
        set.insert("company_preference", next_company_preference(db, company_id).await?);
    }

    if !set.is_empty() {
        db.collection::<Interview>(collections::INTERVIEWS)
            .update_one(doc! { "interviewID": interview_id }, doc! { "$set": set })
            .await
            .map_err(|e| AppError::from_write(e, INTERVIEW_EXISTS))?;
    }

    get_interview(db, interview_id).await
}

pub async fn set_status(
    db: &MongoDB,
    interview_id: &str,
    status: InterviewStatus,
) -> Result<InterviewDetails, AppError> {
    let result = db
        .collection::<Interview>(collections::INTERVIEWS)
        .update_one(
            doc! { "interviewID": interview_id },
            doc! { "$set": { "status": status.as_str() } },
        )
        .await?;
    if result.matched_count == 0 {
        return Err(AppError::not_found("Interview", interview_id));
    }

    log::info!("🔄 Interview {} is now {}", interview_id, status.as_str());
    get_interview(db, interview_id).await
}

pub async fn set_student_preference(
    db: &MongoDB,
    interview_id: &str,
    preference: i32,
) -> Result<InterviewDetails, AppError> {
    crate::models::validate_preference("student_preference", preference)?;

    let result = db
        .collection::<Interview>(collections::INTERVIEWS)
        .update_one(
            doc! { "interviewID": interview_id },
            doc! { "$set": { "student_preference": preference } },
        )
        .await?;
    if result.matched_count == 0 {
        return Err(AppError::not_found("Interview", interview_id));
    }

    get_interview(db, interview_id).await
}

// ==================== DELETE ====================

pub async fn delete_interview(db: &MongoDB, interview_id: &str) -> Result<Interview, AppError> {
    let interview = require_interview(db, interview_id).await?;
    db.collection::<Interview>(collections::INTERVIEWS)
        .delete_one(doc! { "interviewID": interview_id })
        .await?;

    log::info!("🗑️  Interview deleted: {}", interview_id);
    Ok(interview)
}

/// Deletes a pre-listed interview and closes the gap in the company's queue.
pub async fn delete_prelisted(db: &MongoDB, interview_id: &str) -> Result<(), AppError> {
    let interview: Interview = db
        .find_one(
            collections::INTERVIEWS,
            doc! { "interviewID": interview_id, "type": InterviewType::PreListed.as_str() },
        )
        .await?
        .ok_or_else(|| AppError::not_found("Pre-listed interview", interview_id))?;

    delete_interview(db, interview_id).await?;
    renumber_company_preferences(db, &interview.company_id).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidate(id: &str, created_at: i64, group: StudentGroup, level: StudentLevel) -> WalkinCandidate {
        WalkinCandidate {
            interview_id: id.into(),
            created_at,
            group: Some(group),
            level: Some(level),
        }
    }

    fn ids(candidates: &[WalkinCandidate]) -> Vec<&str> {
        candidates.iter().map(|c| c.interview_id.as_str()).collect()
    }

    fn prelisted(id: &str, preference: i32) -> Interview {
        Interview {
            interview_id: id.into(),
            stall_id: None,
            company_id: "c1".into(),
            student_id: format!("student-{}", id),
            interview_type: InterviewType::PreListed,
            status: InterviewStatus::InQueue,
            remark: None,
            student_preference: DEFAULT_PREFERENCE,
            company_preference: preference,
            created_at: 0,
        }
    }

    #[test]
    fn test_rank_without_preference_uses_level_then_arrival() {
        let mut candidates = vec![
            candidate("early-l2", 1, StudentGroup::Cs, StudentLevel::Level2),
            candidate("late-l4", 9, StudentGroup::Bt, StudentLevel::Level4),
            candidate("early-l4", 3, StudentGroup::Zl, StudentLevel::Level4),
        ];
        rank_walkins(&mut candidates, StallPreference::All);
        assert_eq!(ids(&candidates), vec!["early-l4", "late-l4", "early-l2"]);
    }

    #[test]
    fn test_rank_puts_preferred_stream_first() {
        let mut candidates = vec![
            candidate("senior-bt", 1, StudentGroup::Bt, StudentLevel::Level4),
            candidate("junior-cs", 5, StudentGroup::Cs, StudentLevel::Level1),
            candidate("senior-cs", 7, StudentGroup::Cs, StudentLevel::Level3),
        ];
        rank_walkins(&mut candidates, StallPreference::Cs);
        assert_eq!(ids(&candidates), vec!["senior-cs", "junior-cs", "senior-bt"]);
    }

    #[test]
    fn test_rank_puts_missing_students_last() {
        let mut candidates = vec![
            WalkinCandidate {
                interview_id: "orphan".into(),
                created_at: 0,
                group: None,
                level: None,
            },
            candidate("l1", 10, StudentGroup::Ml, StudentLevel::Level1),
        ];
        rank_walkins(&mut candidates, StallPreference::All);
        assert_eq!(ids(&candidates), vec!["l1", "orphan"]);
    }

    #[test]
    fn test_renumber_plan_closes_gaps() {
        let queue = vec![prelisted("a", 1), prelisted("b", 3), prelisted("c", 4)];
        assert_eq!(
            renumber_plan(&queue),
            vec![("b".to_string(), 2), ("c".to_string(), 3)]
        );
    }

    #[test]
    fn test_renumber_plan_noop_when_compact() {
        let queue = vec![prelisted("a", 1), prelisted("b", 2)];
        assert!(renumber_plan(&queue).is_empty());
        assert!(renumber_plan(&[]).is_empty());
    }

    #[test]
    fn test_waiting_walkins_filter() {
        assert_eq!(
            waiting_walkins_filter("c1"),
            doc! { "companyID": "c1", "type": "walk-in", "status": "scheduled", "stallID": null }
        );
    }

    // ==================== MONGODB ====================

    mod live {
        use super::*;
        use crate::models::{CreateCompanyRequest, CreateRoomRequest, CreateStallRequest, CreateStudentRequest};
        use crate::services::room_service;
        use serde_json::json;

        async fn test_db() -> MongoDB {
            dotenv::dotenv().ok();
            let url = std::env::var("DATABASE_URL").unwrap_or_else(|_| "mongodb://localhost:27017".into());
            MongoDB::new(&url, "industry_day_test").await.unwrap()
        }

        async fn seed_company(db: &MongoDB) -> String {
            let tag = new_id();
            let request: CreateCompanyRequest = serde_json::from_value(json!({
                "user": { "email": format!("hr-{}@acme.io", tag), "first_name": "Hr", "last_name": "Team" },
                "company": {
                    "companyName": format!("Acme {}", tag),
                    "description": "Widgets",
                    "sponsership": "GOLD",
                    "contactPersonName": "Nimal",
                    "contactPersonDesignation": "HR",
                    "contactNumber": "0771234567",
                    "location": "Colombo"
                }
            }))
            .unwrap();
            company_service::create_company(db, &request).await.unwrap().company.company_id
        }

        async fn seed_student(db: &MongoDB, group: &str, level: &str) -> String {
            let tag = new_id();
            let request: CreateStudentRequest = serde_json::from_value(json!({
                "user": { "email": format!("s-{}@uni.lk", tag), "first_name": "Stu", "last_name": "Dent" },
                "student": { "regNo": format!("REG-{}", tag), "nic": format!("NIC-{}", tag), "group": group, "level": level }
            }))
            .unwrap();
            student_service::create_student(db, &request).await.unwrap().student.student_id
        }

        async fn seed_stall(db: &MongoDB, company_id: &str, preference: &str) -> String {
            let room = room_service::create_room(
                db,
                &CreateRoomRequest {
                    room_name: format!("Hall {}", new_id()),
                    location: "Main Building".into(),
                    is_active: Some(true),
                },
            )
            .await
            .unwrap();
            let request: CreateStallRequest = serde_json::from_value(json!({
                "title": "Stall",
                "roomID": room.room_id,
                "companyID": company_id,
                "preference": preference
            }))
            .unwrap();
            stall_service::create_stall(db, &request).await.unwrap().stall.stall_id
        }

        fn request(company_id: &str, student_id: &str, interview_type: &str) -> CreateInterviewRequest {
            serde_json::from_value(json!({
                "companyID": company_id,
                "studentID": student_id,
                "type": interview_type
            }))
            .unwrap()
        }

        async fn company_preferences(db: &MongoDB, company_id: &str) -> Vec<(String, i32)> {
            list_prelisted_by_company(db, company_id)
                .await
                .unwrap()
                .into_iter()
                .map(|d| (d.interview.student_id, d.interview.company_preference))
                .collect()
        }

        #[tokio::test]
        #[ignore] // Requires MongoDB to be running
        async fn test_concurrent_pulls_never_share_a_walkin() {
            let db = test_db().await;
            let company_id = seed_company(&db).await;
            let stall_a = seed_stall(&db, &company_id, "ALL").await;
            let stall_b = seed_stall(&db, &company_id, "CS").await;
            for group in ["CS", "BT", "ZL"] {
                let student_id = seed_student(&db, group, "level_2").await;
                create_interview(&db, &request(&company_id, &student_id, "walk-in")).await.unwrap();
            }
            assert_eq!(count_waiting_walkins(&db, &company_id).await.unwrap(), 3);

            let (a, b) = tokio::join!(
                assign_next_walkins(&db, &company_id, &stall_a, 2),
                assign_next_walkins(&db, &company_id, &stall_b, 2),
            );
            let (a, b) = (a.unwrap(), b.unwrap());

            assert_eq!(a.len() + b.len(), 3);
            assert!(a.len() < 2 || b.len() < 2);
            for claimed in &a {
                assert!(b.iter().all(|other| other.interview.interview_id != claimed.interview.interview_id));
                assert_eq!(claimed.interview.stall_id.as_deref(), Some(stall_a.as_str()));
                assert_eq!(claimed.interview.status, InterviewStatus::InQueue);
            }
            assert_eq!(count_waiting_walkins(&db, &company_id).await.unwrap(), 0);
            assert!(assign_next_walkins(&db, &company_id, &stall_a, 1).await.unwrap().is_empty());
        }

        #[tokio::test]
        #[ignore] // Requires MongoDB to be running
        async fn test_clear_walkins_only_requeues_in_queue_rows() {
            let db = test_db().await;
            let company_id = seed_company(&db).await;
            let stall_id = seed_stall(&db, &company_id, "ALL").await;
            for _ in 0..2 {
                let student_id = seed_student(&db, "ML", "level_1").await;
                create_interview(&db, &request(&company_id, &student_id, "walk-in")).await.unwrap();
            }

            let claimed = assign_next_walkins(&db, &company_id, &stall_id, 2).await.unwrap();
            let done = &claimed[0].interview.interview_id;
            set_status(&db, done, InterviewStatus::Completed).await.unwrap();

            assert_eq!(clear_walkins_from_stall(&db, &stall_id).await.unwrap(), 1);
            assert_eq!(count_waiting_walkins(&db, &company_id).await.unwrap(), 1);

            let completed = get_interview(&db, done).await.unwrap().interview;
            assert_eq!(completed.status, InterviewStatus::Completed);
            assert_eq!(completed.stall_id.as_deref(), Some(stall_id.as_str()));
        }

        #[tokio::test]
        #[ignore] // Requires MongoDB to be running
        async fn test_deleting_stall_returns_walkins_to_pool() {
            let db = test_db().await;
            let company_id = seed_company(&db).await;
            let stall_id = seed_stall(&db, &company_id, "ALL").await;
            let student_id = seed_student(&db, "DS", "level_3").await;
            create_interview(&db, &request(&company_id, &student_id, "walk-in")).await.unwrap();

            assert_eq!(assign_next_walkins(&db, &company_id, &stall_id, 1).await.unwrap().len(), 1);
            assert_eq!(count_waiting_walkins(&db, &company_id).await.unwrap(), 0);

            stall_service::delete_stall(&db, &stall_id).await.unwrap();
            assert_eq!(count_waiting_walkins(&db, &company_id).await.unwrap(), 1);

            let replacement = seed_stall(&db, &company_id, "ALL").await;
            let pulled = assign_next_walkins(&db, &company_id, &replacement, 1).await.unwrap();
            assert_eq!(pulled[0].interview.student_id, student_id);
        }

        #[tokio::test]
        #[ignore] // Requires MongoDB to be running
        async fn test_prelisted_numbering_and_delete_renumbering() {
            let db = test_db().await;
            let company_id = seed_company(&db).await;
            let mut students = Vec::new();
            for _ in 0..3 {
                let student_id = seed_student(&db, "CH", "level_4").await;
                create_interview(&db, &request(&company_id, &student_id, "pre-listed")).await.unwrap();
                students.push(student_id);
            }
            let expected: Vec<(String, i32)> = students.iter().cloned().zip(1..).collect();
            assert_eq!(company_preferences(&db, &company_id).await, expected);

            let middle = list_prelisted_by_company(&db, &company_id).await.unwrap()[1]
                .interview
                .interview_id
                .clone();
            delete_prelisted(&db, &middle).await.unwrap();
            assert_eq!(
                company_preferences(&db, &company_id).await,
                vec![(students[0].clone(), 1), (students[2].clone(), 2)]
            );

            let walkin_student = seed_student(&db, "CH", "level_1").await;
            let walkin = create_interview(&db, &request(&company_id, &walkin_student, "walk-in"))
                .await
                .unwrap()
                .interview
                .interview_id;
            let result = delete_prelisted(&db, &walkin).await;
            let expected_message = format!("Pre-listed interview with ID {} not found", walkin);
            assert!(matches!(result, Err(AppError::NotFound(ref msg)) if *msg == expected_message));
        }

        #[tokio::test]
        #[ignore] // Requires MongoDB to be running
        async fn test_prelist_bulk_appends_in_batch_order() {
            let db = test_db().await;
            let company_id = seed_company(&db).await;

            let existing = seed_student(&db, "MT", "level_2").await;
            let mut gapped = request(&company_id, &existing, "pre-listed");
            gapped.company_preference = Some(5);
            create_interview(&db, &gapped).await.unwrap();

            let first = seed_student(&db, "MT", "level_2").await;
            let second = seed_student(&db, "MT", "level_2").await;
            let batch = vec![
                json!({ "companyID": company_id, "studentID": first, "type": "walk-in" }),
                json!({ "companyID": company_id, "type": "pre-listed" }),
                json!({ "companyID": company_id, "studentID": second, "type": "pre-listed" }),
            ];

            let result = bulk_create_prelist(&db, batch).await.unwrap();
            assert_eq!(result.summary.successful, 2);
            assert_eq!(result.failed[0].index, 1);
            assert_eq!(
                company_preferences(&db, &company_id).await,
                vec![(existing, 1), (first, 2), (second, 3)]
            );
        }

        #[tokio::test]
        #[ignore] // Requires MongoDB to be running
        async fn test_patch_checks_references_and_queues_prelisted() {
            let db = test_db().await;
            let company_id = seed_company(&db).await;
            let student_id = seed_student(&db, "BT", "level_1").await;
            let interview_id = create_interview(&db, &request(&company_id, &student_id, "walk-in"))
                .await
                .unwrap()
                .interview
                .interview_id;

            let unknown_student = UpdateInterviewRequest {
                student_id: Some(new_id()),
                ..Default::default()
            };
            assert!(matches!(
                update_interview(&db, &interview_id, &unknown_student).await,
                Err(AppError::NotFound(_))
            ));

            let unknown_company = UpdateInterviewRequest {
                company_id: Some(new_id()),
                ..Default::default()
            };
            assert!(matches!(
                update_interview(&db, &interview_id, &unknown_company).await,
                Err(AppError::NotFound(_))
            ));

            let to_prelisted = UpdateInterviewRequest {
                interview_type: Some(InterviewType::PreListed),
                ..Default::default()
            };
            let updated = update_interview(&db, &interview_id, &to_prelisted).await.unwrap().interview;
            assert_eq!(updated.interview_type, InterviewType::PreListed);
            assert_eq!(updated.company_preference, 1);
            assert_eq!(updated.student_id, student_id);
        }
    }
}
