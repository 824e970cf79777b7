use serde::de::DeserializeOwned;
use serde::Serialize;
use utoipa::ToSchema;

use crate::utils::error::AppError;
use crate::utils::validation::Validate;

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct BulkFailure {
    pub index: usize,
    pub error: String,
}

#[derive(Debug, Clone, Default, Serialize, ToSchema)]
pub struct BulkSummary {
    pub total: usize,
    pub successful: usize,
    pub failed: usize,
}

/// Outcome of a batch where every item is attempted independently.
#[derive(Debug, Clone, Serialize)]
pub struct BulkResult<T> {
    pub successful: Vec<T>,
    pub failed: Vec<BulkFailure>,
    pub summary: BulkSummary,
}

impl<T> BulkResult<T> {
    pub fn with_capacity(total: usize) -> Self {
        Self {
            successful: Vec::with_capacity(total),
            failed: Vec::new(),
            summary: BulkSummary {
                total,
                ..Default::default()
            },
        }
    }

    pub fn record<E: std::fmt::Display>(&mut self, index: usize, outcome: Result<T, E>) {
        match outcome {
            Ok(item) => {
                self.successful.push(item);
                self.summary.successful += 1;
            }
            Err(e) => {
                self.failed.push(BulkFailure {
                    index,
                    error: e.to_string(),
                });
                self.summary.failed += 1;
            }
        }
    }
}

/// Decodes and validates each raw batch entry separately, so one malformed
/// entry fails alone instead of rejecting the whole body.
pub fn parse_items<T>(items: Vec<serde_json::Value>) -> Vec<Result<T, AppError>>
where
    T: DeserializeOwned + Validate,
{
    items
        .into_iter()
        .map(|item| {
            let request: T =
                serde_json::from_value(item).map_err(|e| AppError::Validation(e.to_string()))?;
            request.validate()?;
            Ok(request)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CreateInterviewRequest, InterviewType};
    use serde_json::json;

    #[test]
    fn test_parse_items_isolates_bad_entries() {
        let items = vec![
            json!({ "companyID": "c1", "studentID": "s1", "type": "walk-in" }),
            json!({ "companyID": "c1", "studentID": "s2", "type": "walkin" }),
            json!({ "companyID": "", "studentID": "s3", "type": "pre-listed" }),
            json!(42),
        ];

        let parsed = parse_items::<CreateInterviewRequest>(items);
        assert_eq!(parsed.len(), 4);
        assert!(matches!(&parsed[0], Ok(r) if r.interview_type == InterviewType::WalkIn));
        assert!(matches!(&parsed[1], Err(AppError::Validation(msg)) if msg.contains("walkin")));
        assert!(matches!(&parsed[2], Err(AppError::Validation(msg)) if msg.contains("companyID")));
        assert!(matches!(&parsed[3], Err(AppError::Validation(_))));

        let mut result = BulkResult::with_capacity(parsed.len());
        for (index, outcome) in parsed.into_iter().enumerate() {
            result.record(index, outcome.map(|r| r.student_id));
        }
        assert_eq!(result.successful, vec!["s1".to_string()]);
        assert_eq!(result.failed.iter().map(|f| f.index).collect::<Vec<_>>(), vec![1, 2, 3]);
        assert_eq!(result.summary.successful, 1);
        assert_eq!(result.summary.failed, 3);
    }

    #[test]
    fn test_record_tracks_both_outcomes() {
        let mut result = BulkResult::with_capacity(3);
        result.record(0, Ok::<_, String>("a"));
        result.record(1, Err::<&str, _>("duplicate".to_string()));
        result.record(2, Ok::<_, String>("c"));

        assert_eq!(result.successful, vec!["a", "c"]);
        assert_eq!(result.failed.len(), 1);
        assert_eq!(result.failed[0].index, 1);
        assert_eq!(result.failed[0].error, "duplicate");
        assert_eq!(result.summary.total, 3);
        assert_eq!(result.summary.successful, 2);
        assert_eq!(result.summary.failed, 1);
    }
}
