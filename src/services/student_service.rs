use mongodb::bson::{doc, Document};
use std::collections::HashMap;

use crate::database::{collections, MongoDB};
use crate::models::{
    CreateStudentRequest, Student, StudentDetails, StudentFilterQuery, UpdateStudentRequest,
    UserRole,
};
use crate::services::user_service;
use crate::utils::{error::AppError, new_id, now_millis};

const STUDENT_EXISTS: &str = "A student with this registration number or NIC already exists";

async fn with_users(db: &MongoDB, students: Vec<Student>) -> Result<Vec<StudentDetails>, AppError> {
    let user_ids: Vec<String> = students.iter().map(|s| s.user_id.clone()).collect();
    let mut users = user_service::users_by_ids(db, &user_ids).await?;

    Ok(students
        .into_iter()
        .map(|student| StudentDetails {
            user: users.remove(&student.user_id),
            student,
        })
        .collect())
}

async fn details(db: &MongoDB, student: Student) -> Result<StudentDetails, AppError> {
    let user = user_service::find_user(db, &student.user_id).await?.map(Into::into);
    Ok(StudentDetails { student, user })
}

async fn ensure_unique(db: &MongoDB, filter: Document) -> Result<(), AppError> {
    if db.count(collections::STUDENTS, filter).await? > 0 {
        return Err(AppError::Conflict(STUDENT_EXISTS.to_string()));
    }
    Ok(())
}

/// Creates the account and the profile. The account is rolled back if the profile insert fails.
pub async fn create_student(db: &MongoDB, request: &CreateStudentRequest) -> Result<StudentDetails, AppError> {
    let profile = &request.student;
    ensure_unique(
        db,
        doc! { "$or": [ { "regNo": &profile.reg_no }, { "nic": &profile.nic } ] },
    )
    .await?;

    let user = user_service::create_user(db, &request.user, UserRole::Student).await?;

    let student = Student {
        student_id: new_id(),
        user_id: user.user_id.clone(),
        reg_no: profile.reg_no.trim().to_string(),
        nic: profile.nic.trim().to_string(),
        linkedin: profile.linkedin.clone(),
        contact: profile.contact.clone(),
        group: profile.group,
        level: profile.level,
        created_at: now_millis(),
    };

    if let Err(e) = db
        .collection::<Student>(collections::STUDENTS)
        .insert_one(&student)
        .await
    {
        user_service::delete_user(db, &user.user_id).await?;
        return Err(AppError::from_write(e, STUDENT_EXISTS));
    }

    log::info!("✅ Student created: {} ({})", student.student_id, student.reg_no);
    Ok(StudentDetails {
        student,
        user: Some(user.into()),
    })
}

pub async fn list_students(db: &MongoDB) -> Result<Vec<StudentDetails>, AppError> {
    let students = db
        .find_many(collections::STUDENTS, doc! {}, Some(doc! { "created_at": -1 }))
        .await?;
    with_users(db, students).await
}

pub fn filter_doc(query: &StudentFilterQuery) -> Document {
    let mut filter = Document::new();
    if let Some(group) = query.group {
        filter.insert("group", group.as_str());
    }
    if let Some(level) = query.level {
        filter.insert("level", level.as_str());
    }
    filter
}

pub async fn filter_students(db: &MongoDB, query: &StudentFilterQuery) -> Result<Vec<StudentDetails>, AppError> {
    let students = db
        .find_many(collections::STUDENTS, filter_doc(query), Some(doc! { "regNo": 1 }))
        .await?;
    with_users(db, students).await
}

pub async fn find_student(db: &MongoDB, student_id: &str) -> Result<Option<Student>, AppError> {
    db.find_one(collections::STUDENTS, doc! { "studentID": student_id }).await
}

pub async fn find_by_reg_no(db: &MongoDB, reg_no: &str) -> Result<Option<Student>, AppError> {
    db.find_one(collections::STUDENTS, doc! { "regNo": reg_no.trim() }).await
}

pub async fn get_student(db: &MongoDB, student_id: &str) -> Result<StudentDetails, AppError> {
    let student = find_student(db, student_id)
        .await?
        .ok_or_else(|| AppError::not_found("Student", student_id))?;
    details(db, student).await
}

pub async fn get_by_reg_no(db: &MongoDB, reg_no: &str) -> Result<StudentDetails, AppError> {
    let student = find_by_reg_no(db, reg_no).await?.ok_or_else(|| {
        AppError::NotFound(format!("Student with registration number {} not found", reg_no))
    })?;
    details(db, student).await
}

pub async fn get_by_user(db: &MongoDB, user_id: &str) -> Result<StudentDetails, AppError> {
    let student: Student = db
        .find_one(collections::STUDENTS, doc! { "userID": user_id })
        .await?
        .ok_or_else(|| AppError::NotFound("Student profile not found".to_string()))?;
    details(db, student).await
}

pub async fn update_student(
    db: &MongoDB,
    student_id: &str,
    request: &UpdateStudentRequest,
) -> Result<StudentDetails, AppError> {
    let student = find_student(db, student_id)
        .await?
        .ok_or_else(|| AppError::not_found("Student", student_id))?;

    let mut clashes = Vec::new();
    if let Some(reg_no) = &request.reg_no {
        clashes.push(doc! { "regNo": reg_no });
    }
    if let Some(nic) = &request.nic {
        clashes.push(doc! { "nic": nic });
    }
    if !clashes.is_empty() {
        ensure_unique(db, doc! { "studentID": { "$ne": student_id }, "$or": clashes }).await?;
    }

    let set = request.to_set_doc();
    if !set.is_empty() {
        db.collection::<Student>(collections::STUDENTS)
            .update_one(doc! { "studentID": student_id }, doc! { "$set": set })
            .await
            .map_err(|e| AppError::from_write(e, STUDENT_EXISTS))?;
    }

    if let Some(user) = &request.user {
        user_service::update_user(db, &student.user_id, user).await?;
    }

    get_student(db, student_id).await
}

/// Removes the profile together with its account.
pub async fn delete_student(db: &MongoDB, student_id: &str) -> Result<(), AppError> {
    let student = find_student(db, student_id)
        .await?
        .ok_or_else(|| AppError::not_found("Student", student_id))?;

    db.collection::<Student>(collections::STUDENTS)
        .delete_one(doc! { "studentID": student_id })
        .await?;
    user_service::delete_user(db, &student.user_id).await?;

    log::info!("🗑️  Student deleted: {}", student_id);
    Ok(())
}

/// Loads `ids` with their accounts, keyed by studentID.
pub async fn students_by_ids(db: &MongoDB, ids: &[String]) -> Result<HashMap<String, StudentDetails>, AppError> {
    if ids.is_empty() {
        return Ok(HashMap::new());
    }

    let students = db
        .find_many(collections::STUDENTS, doc! { "studentID": { "$in": ids.to_vec() } }, None)
        .await?;

    Ok(with_users(db, students)
        .await?
        .into_iter()
        .map(|details| (details.student.student_id.clone(), details))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{StudentGroup, StudentLevel};

    #[test]
    fn test_filter_doc() {
        let query = StudentFilterQuery {
            group: Some(StudentGroup::Cs),
            level: Some(StudentLevel::Level3),
        };
        assert_eq!(filter_doc(&query), doc! { "group": "CS", "level": "level_3" });
        assert!(filter_doc(&StudentFilterQuery::default()).is_empty());
    }

    #[tokio::test]
    #[ignore] // Requires MongoDB to be running
    async fn test_by_user_without_profile_is_not_found() {
        dotenv::dotenv().ok();
        let url = std::env::var("DATABASE_URL").unwrap_or_else(|_| "mongodb://localhost:27017".into());
        let db = MongoDB::new(&url, "industry_day_test").await.unwrap();

        let result = get_by_user(&db, &new_id()).await;
        assert!(matches!(result, Err(AppError::NotFound(ref msg)) if msg == "Student profile not found"));
    }
}
