use base64::Engine;
use rand::distributions::Alphanumeric;
use rand::Rng;
use std::collections::HashMap;
use tokio::sync::RwLock;

use crate::models::{MemoryUsage, PdfInfo, StorageStats, UploadPdfRequest, PDF_MIME_TYPE};
use crate::utils::{error::AppError, now_millis};

struct StoredPdf {
    info: PdfInfo,
    bytes: Vec<u8>,
}

/// In-memory PDF store shared across workers through `web::Data`.
/// Entries live until deleted or the process exits.
pub struct PdfStorage {
    files: RwLock<HashMap<String, StoredPdf>>,
    max_bytes: usize,
}

impl PdfStorage {
    pub fn new(max_bytes: usize) -> Self {
        Self {
            files: RwLock::new(HashMap::new()),
            max_bytes,
        }
    }

    /// Decodes and stores an upload, returning its metadata.
    pub async fn store_upload(&self, upload: &UploadPdfRequest) -> Result<PdfInfo, AppError> {
        if upload.content_type != PDF_MIME_TYPE {
            return Err(AppError::Validation("Only PDF files are allowed".to_string()));
        }

        let bytes = base64::engine::general_purpose::STANDARD
            .decode(upload.data.trim())
            .map_err(|e| AppError::Validation(format!("File data is not valid base64: {}", e)))?;

        self.store(bytes, &upload.filename, upload.custom_filename.as_deref())
            .await
    }

    pub async fn store(
        &self,
        bytes: Vec<u8>,
        original_name: &str,
        custom_filename: Option<&str>,
    ) -> Result<PdfInfo, AppError> {
        if bytes.is_empty() {
            return Err(AppError::Validation("File is empty".to_string()));
        }
        if bytes.len() > self.max_bytes {
            return Err(AppError::Validation(format!(
                "File exceeds the maximum size of {} bytes",
                self.max_bytes
            )));
        }

        let uploaded_at = now_millis();
        let info = PdfInfo {
            id: generate_pdf_id(uploaded_at),
            original_name: original_name.to_string(),
            filename: pdf_filename(custom_filename.unwrap_or(original_name)),
            mimetype: PDF_MIME_TYPE.to_string(),
            size: bytes.len(),
            uploaded_at,
        };

        self.files.write().await.insert(
            info.id.clone(),
            StoredPdf {
                info: info.clone(),
                bytes,
            },
        );

        log::info!("📄 Stored PDF {} ({}, {} bytes)", info.id, info.filename, info.size);
        Ok(info)
    }

    pub async fn info(&self, id: &str) -> Option<PdfInfo> {
        self.files.read().await.get(id).map(|pdf| pdf.info.clone())
    }

    pub async fn retrieve(&self, id: &str) -> Option<(PdfInfo, Vec<u8>)> {
        self.files
            .read()
            .await
            .get(id)
            .map(|pdf| (pdf.info.clone(), pdf.bytes.clone()))
    }

    pub async fn delete(&self, id: &str) -> bool {
        let removed = self.files.write().await.remove(id).is_some();
        if removed {
            log::info!("🗑️  Deleted PDF {}", id);
        }
        removed
    }

    /// Metadata of every stored file, oldest first.
    pub async fn list(&self) -> Vec<PdfInfo> {
        let mut infos: Vec<PdfInfo> = self
            .files
            .read()
            .await
            .values()
            .map(|pdf| pdf.info.clone())
            .collect();
        infos.sort_by(|a, b| a.uploaded_at.cmp(&b.uploaded_at).then_with(|| a.id.cmp(&b.id)));
        infos
    }

    pub async fn stats(&self) -> StorageStats {
        compute_stats(&self.list().await)
    }

    pub async fn memory_usage(&self) -> MemoryUsage {
        let bytes = self
            .files
            .read()
            .await
            .values()
            .map(|pdf| pdf.bytes.len())
            .sum();
        memory_usage(bytes)
    }
}

fn generate_pdf_id(millis: i64) -> String {
    let suffix: String = rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(8)
        .map(|c| char::from(c).to_ascii_lowercase())
        .collect();
    format!("pdf_{}_{}", to_base36(millis.max(0) as u64), suffix)
}

fn to_base36(mut value: u64) -> String {
    const DIGITS: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";
    if value == 0 {
        return "0".to_string();
    }
    let mut out = Vec::new();
    while value > 0 {
        out.push(DIGITS[(value % 36) as usize]);
        value /= 36;
    }
    out.reverse();
    String::from_utf8_lossy(&out).into_owned()
}

/// Keeps `[A-Za-z0-9._-]`, replaces everything else with `_` and ensures a `.pdf` suffix.
pub fn pdf_filename(name: &str) -> String {
    let mut sanitized: String = name
        .trim()
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') {
                c
            } else {
                '_'
            }
        })
        .collect();

    if sanitized.is_empty() {
        sanitized.push_str("document");
    }
    if !sanitized.to_ascii_lowercase().ends_with(".pdf") {
        sanitized.push_str(".pdf");
    }
    sanitized
}

fn compute_stats(files: &[PdfInfo]) -> StorageStats {
    let total_size: usize = files.iter().map(|f| f.size).sum();
    let average_size = if files.is_empty() {
        0
    } else {
        (total_size as f64 / files.len() as f64).round() as usize
    };

    StorageStats {
        total_files: files.len(),
        total_size,
        average_size,
        oldest_file: files.iter().min_by_key(|f| f.uploaded_at).cloned(),
        newest_file: files.iter().max_by_key(|f| f.uploaded_at).cloned(),
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

fn memory_usage(bytes: usize) -> MemoryUsage {
    let megabytes = bytes as f64 / (1024.0 * 1024.0);
    MemoryUsage {
        bytes,
        megabytes: round2(megabytes),
        gigabytes: round2(megabytes / 1024.0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn upload(data: &[u8], content_type: &str) -> UploadPdfRequest {
        UploadPdfRequest {
            filename: "My CV (final).pdf".into(),
            content_type: content_type.into(),
            data: base64::engine::general_purpose::STANDARD.encode(data),
            custom_filename: None,
        }
    }

    #[test]
    fn test_pdf_filename_sanitizing() {
        assert_eq!(pdf_filename("My CV (final).pdf"), "My_CV__final_.pdf");
        assert_eq!(pdf_filename("report"), "report.pdf");
        assert_eq!(pdf_filename("REPORT.PDF"), "REPORT.PDF");
        assert_eq!(pdf_filename("   "), "document.pdf");
    }

    #[test]
    fn test_base36() {
        assert_eq!(to_base36(0), "0");
        assert_eq!(to_base36(35), "z");
        assert_eq!(to_base36(36), "10");
    }

    #[test]
    fn test_generated_ids_are_distinct() {
        let a = generate_pdf_id(1_700_000_000_000);
        let b = generate_pdf_id(1_700_000_000_000);
        assert!(a.starts_with("pdf_"));
        assert_eq!(a.split('_').count(), 3);
        assert_ne!(a, b);
    }

    #[test]
    fn test_stats_over_files() {
        let file = |id: &str, size: usize, at: i64| PdfInfo {
            id: id.into(),
            original_name: format!("{}.pdf", id),
            filename: format!("{}.pdf", id),
            mimetype: PDF_MIME_TYPE.into(),
            size,
            uploaded_at: at,
        };
        let stats = compute_stats(&[file("a", 10, 5), file("b", 15, 1), file("c", 20, 9)]);
        assert_eq!(stats.total_files, 3);
        assert_eq!(stats.total_size, 45);
        assert_eq!(stats.average_size, 15);
        assert_eq!(stats.oldest_file.unwrap().id, "b");
        assert_eq!(stats.newest_file.unwrap().id, "c");

        let empty = compute_stats(&[]);
        assert_eq!(empty.average_size, 0);
        assert!(empty.oldest_file.is_none());
    }

    #[test]
    fn test_memory_usage_rounding() {
        let usage = memory_usage(3 * 1024 * 1024 / 2);
        assert_eq!(usage.megabytes, 1.5);
        assert_eq!(usage.gigabytes, 0.0);
    }

    #[tokio::test]
    async fn test_store_retrieve_delete() {
        let storage = PdfStorage::new(1024);
        let info = storage
            .store_upload(&upload(b"%PDF-1.4 test", PDF_MIME_TYPE))
            .await
            .unwrap();

        assert_eq!(info.filename, "My_CV__final_.pdf");
        assert!(storage.info(&info.id).await.is_some());

        let (_, bytes) = storage.retrieve(&info.id).await.unwrap();
        assert_eq!(bytes, b"%PDF-1.4 test");
        assert_eq!(storage.memory_usage().await.bytes, 13);

        assert!(storage.delete(&info.id).await);
        assert!(!storage.delete(&info.id).await);
        assert!(storage.list().await.is_empty());
    }

    #[tokio::test]
    async fn test_rejects_non_pdf_and_oversized() {
        let storage = PdfStorage::new(4);
        let wrong_type = storage.store_upload(&upload(b"%P", "image/png")).await;
        assert!(matches!(wrong_type, Err(AppError::Validation(_))));

        let too_big = storage.store_upload(&upload(b"%PDF-1.4", PDF_MIME_TYPE)).await;
        assert!(matches!(too_big, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_custom_filename_wins() {
        let storage = PdfStorage::new(1024);
        let mut request = upload(b"%PDF", PDF_MIME_TYPE);
        request.custom_filename = Some("acme job spec".into());
        let info = storage.store_upload(&request).await.unwrap();
        assert_eq!(info.filename, "acme_job_spec.pdf");
        assert_eq!(info.original_name, "My CV (final).pdf");
    }
}
