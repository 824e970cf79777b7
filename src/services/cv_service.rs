use mongodb::bson::{doc, Document};

use crate::database::{collections, MongoDB};
use crate::models::{CreateCvByRegNoRequest, CreateCvRequest, StudentCv, StudentCvDetails, UpdateCvRequest};
use crate::services::student_service;
use crate::utils::{error::AppError, new_id, now_millis};

fn newest_first() -> Document {
    doc! { "created_at": -1 }
}

async fn with_students(db: &MongoDB, cvs: Vec<StudentCv>) -> Result<Vec<StudentCvDetails>, AppError> {
    let student_ids: Vec<String> = cvs.iter().map(|cv| cv.student_id.clone()).collect();
    let students = student_service::students_by_ids(db, &student_ids).await?;

    Ok(cvs
        .into_iter()
        .map(|cv| StudentCvDetails {
            student: students.get(&cv.student_id).cloned(),
            cv,
        })
        .collect())
}

async fn one_with_student(db: &MongoDB, cv: StudentCv) -> Result<StudentCvDetails, AppError> {
    let cv_id = cv.cv_id.clone();
    with_students(db, vec![cv])
        .await?
        .pop()
        .ok_or_else(|| AppError::not_found("CV", &cv_id))
}

async fn insert_cv(
    db: &MongoDB,
    student_id: &str,
    file_name: &str,
    file_path: Option<&str>,
) -> Result<StudentCvDetails, AppError> {
    let cv = StudentCv {
        cv_id: new_id(),
        student_id: student_id.to_string(),
        file_name: file_name.trim().to_string(),
        file_path: file_path.map(String::from),
        created_at: now_millis(),
    };

    db.collection::<StudentCv>(collections::STUDENT_CVS)
        .insert_one(&cv)
        .await?;
    log::info!("📄 CV {} registered for student {}", cv.cv_id, student_id);

    one_with_student(db, cv).await
}

pub async fn create_cv(db: &MongoDB, request: &CreateCvRequest) -> Result<StudentCvDetails, AppError> {
    student_service::find_student(db, &request.student_id)
        .await?
        .ok_or_else(|| AppError::not_found("Student", &request.student_id))?;

    insert_cv(db, &request.student_id, &request.file_name, request.file_path.as_deref()).await
}

/// Registers a CV for the student holding `regNo`. The same file name twice is a conflict.
pub async fn create_by_reg_no(db: &MongoDB, request: &CreateCvByRegNoRequest) -> Result<StudentCvDetails, AppError> {
    let student = student_service::find_by_reg_no(db, &request.reg_no)
        .await?
        .ok_or_else(|| {
            AppError::NotFound(format!(
                "Student with registration number {} not found",
                request.reg_no
            ))
        })?;

    let file_name = request.file_name.trim();
    let existing = db
        .count(
            collections::STUDENT_CVS,
            doc! { "studentID": &student.student_id, "fileName": file_name },
        )
        .await?;
    if existing > 0 {
        return Err(AppError::Conflict(format!(
            "CV {} already exists for student {}",
            file_name, request.reg_no
        )));
    }

    insert_cv(db, &student.student_id, file_name, request.file_path.as_deref()).await
}

pub async fn list_cvs(db: &MongoDB) -> Result<Vec<StudentCvDetails>, AppError> {
    let cvs = db
        .find_many(collections::STUDENT_CVS, doc! {}, Some(newest_first()))
        .await?;
    with_students(db, cvs).await
}

async fn require_cv(db: &MongoDB, cv_id: &str) -> Result<StudentCv, AppError> {
    db.find_one(collections::STUDENT_CVS, doc! { "cvID": cv_id })
        .await?
        .ok_or_else(|| AppError::not_found("CV", cv_id))
}

pub async fn get_cv(db: &MongoDB, cv_id: &str) -> Result<StudentCvDetails, AppError> {
    let cv = require_cv(db, cv_id).await?;
    one_with_student(db, cv).await
}

/// The most recently registered CV of a student.
pub async fn latest_for_student(db: &MongoDB, student_id: &str) -> Result<StudentCvDetails, AppError> {
    let cv: StudentCv = db
        .collection::<StudentCv>(collections::STUDENT_CVS)
        .find_one(doc! { "studentID": student_id })
        .sort(newest_first())
        .await?
        .ok_or_else(|| AppError::NotFound(format!("No CV found for student {}", student_id)))?;
    one_with_student(db, cv).await
}

pub async fn list_for_student(db: &MongoDB, student_id: &str) -> Result<Vec<StudentCvDetails>, AppError> {
    let cvs = db
        .find_many(
            collections::STUDENT_CVS,
            doc! { "studentID": student_id },
            Some(newest_first()),
        )
        .await?;
    with_students(db, cvs).await
}

pub async fn update_cv(db: &MongoDB, cv_id: &str, request: &UpdateCvRequest) -> Result<StudentCvDetails, AppError> {
    require_cv(db, cv_id).await?;
    if let Some(student_id) = &request.student_id {
        student_service::find_student(db, student_id)
            .await?
            .ok_or_else(|| AppError::not_found("Student", student_id))?;
    }

    let set = request.to_set_doc();
    if !set.is_empty() {
        db.collection::<StudentCv>(collections::STUDENT_CVS)
            .update_one(doc! { "cvID": cv_id }, doc! { "$set": set })
            .await?;
    }

    get_cv(db, cv_id).await
}

pub async fn delete_cv(db: &MongoDB, cv_id: &str) -> Result<(), AppError> {
    let result = db
        .collection::<StudentCv>(collections::STUDENT_CVS)
        .delete_one(doc! { "cvID": cv_id })
        .await?;
    if result.deleted_count == 0 {
        return Err(AppError::not_found("CV", cv_id));
    }
    Ok(())
}
