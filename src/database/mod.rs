use futures::TryStreamExt;
use mongodb::bson::{doc, Document};
use mongodb::options::IndexOptions;
use mongodb::{Client, Collection, Database, IndexModel};
use serde::de::DeserializeOwned;
use std::time::Duration;

use crate::utils::error::AppError;

pub mod collections {
    pub const USERS: &str = "users";
    pub const STUDENTS: &str = "students";
    pub const COMPANIES: &str = "companies";
    pub const ADMINS: &str = "admins";
    pub const ROOM_ADMINS: &str = "room_admins";
    pub const ROOMS: &str = "rooms";
    pub const STALLS: &str = "stalls";
    pub const INTERVIEWS: &str = "interviews";
    pub const ANNOUNCEMENTS: &str = "announcements";
    pub const FEEDBACKS: &str = "feedbacks";
    pub const JOB_POSTS: &str = "job_posts";
    pub const SHORTLISTS: &str = "shortlists";
    pub const STUDENT_CVS: &str = "student_cvs";
}

use collections::*;

/// (collection, keys, unique)
fn index_plan() -> Vec<(&'static str, Document, bool)> {
    vec![
        (USERS, doc! { "userID": 1 }, true),
        (USERS, doc! { "email": 1 }, true),
        (USERS, doc! { "role": 1 }, false),
        (STUDENTS, doc! { "studentID": 1 }, true),
        (STUDENTS, doc! { "regNo": 1 }, true),
        (STUDENTS, doc! { "nic": 1 }, true),
        (STUDENTS, doc! { "userID": 1 }, false),
        (COMPANIES, doc! { "companyID": 1 }, true),
        (COMPANIES, doc! { "userID": 1 }, false),
        (ADMINS, doc! { "adminID": 1 }, true),
        (ADMINS, doc! { "userID": 1 }, false),
        (ROOM_ADMINS, doc! { "roomAdminID": 1 }, true),
        (ROOM_ADMINS, doc! { "userID": 1 }, false),
        (ROOM_ADMINS, doc! { "roomID": 1 }, false),
        (ROOMS, doc! { "roomID": 1 }, true),
        (STALLS, doc! { "stallID": 1 }, true),
        (STALLS, doc! { "companyID": 1 }, false),
        (STALLS, doc! { "roomID": 1 }, false),
        (INTERVIEWS, doc! { "interviewID": 1 }, true),
        (INTERVIEWS, doc! { "companyID": 1, "studentID": 1 }, true),
        (INTERVIEWS, doc! { "companyID": 1, "type": 1, "status": 1 }, false),
        (INTERVIEWS, doc! { "stallID": 1, "status": 1 }, false),
        (ANNOUNCEMENTS, doc! { "announcementID": 1 }, true),
        (ANNOUNCEMENTS, doc! { "created_at": -1 }, false),
        (FEEDBACKS, doc! { "feedbackID": 1 }, true),
        (FEEDBACKS, doc! { "userID": 1 }, false),
        (JOB_POSTS, doc! { "jobPostID": 1 }, true),
        (JOB_POSTS, doc! { "companyID": 1 }, false),
        (SHORTLISTS, doc! { "shortlistID": 1 }, true),
        (SHORTLISTS, doc! { "companyID": 1, "studentID": 1 }, true),
        (STUDENT_CVS, doc! { "cvID": 1 }, true),
        (STUDENT_CVS, doc! { "studentID": 1 }, false),
    ]
}

#[derive(Clone)]
pub struct MongoDB {
    client: Client,
    db: Database,
}

impl MongoDB {
    pub async fn new(uri: &str, db_name: &str) -> Result<Self, AppError> {
        let mut client_options = mongodb::options::ClientOptions::parse(uri).await?;

        client_options.max_pool_size = Some(20);
        client_options.min_pool_size = Some(2);
        client_options.max_idle_time = Some(Duration::from_secs(300));
        client_options.connect_timeout = Some(Duration::from_secs(5));
        client_options.server_selection_timeout = Some(Duration::from_secs(5));
        client_options.app_name = Some("industry-day-api".to_string());

        let client = Client::with_options(client_options)?;
        let db = client.database(db_name);

        let mongodb = Self { client, db };
        mongodb.ping().await?;
        mongodb.ensure_indexes().await?;

        Ok(mongodb)
    }

    /// Handle that never contacts a server until a query runs, for handler tests
    /// that must fail before reaching the database.
    #[cfg(test)]
    pub async fn detached() -> Self {
        let mut options = mongodb::options::ClientOptions::parse("mongodb://127.0.0.1:1")
            .await
            .expect("static test URI parses");
        options.server_selection_timeout = Some(Duration::from_millis(200));
        let client = Client::with_options(options).expect("client options are valid");
        let db = client.database("industry_day_detached");
        Self { client, db }
    }

    /// Creates the unique and lookup indexes. Existing indexes are left as they are.
    async fn ensure_indexes(&self) -> Result<(), AppError> {
        log::info!("🔧 Creating database indexes...");

        for (name, keys, unique) in index_plan() {
            let label = format!(
                "{}({})",
                name,
                keys.keys().cloned().collect::<Vec<_>>().join(", ")
            );
            let index = IndexModel::builder()
                .keys(keys)
                .options(IndexOptions::builder().unique(unique).build())
                .build();

            match self.collection::<Document>(name).create_index(index).await {
                Ok(_) if unique => log::info!("   ✅ Unique index ready: {}", label),
                Ok(_) => log::info!("   ✅ Index ready: {}", label),
                Err(e) => log::warn!("   ⚠️  Index {} not created: {}", label, e),
            }
        }

        log::info!("✅ Database indexes ready");
        Ok(())
    }

    pub async fn ping(&self) -> Result<(), AppError> {
        self.db.run_command(doc! { "ping": 1 }).await?;
        Ok(())
    }

    pub fn collection<T: Send + Sync>(&self, name: &str) -> Collection<T> {
        self.db.collection(name)
    }

    pub fn database(&self) -> &Database {
        &self.db
    }

    pub fn client(&self) -> &Client {
        &self.client
    }

    pub async fn find_one<T>(&self, name: &str, filter: Document) -> Result<Option<T>, AppError>
    where
        T: DeserializeOwned + Send + Sync,
    {
        Ok(self.collection::<T>(name).find_one(filter).await?)
    }

    /// Collects every document matching `filter`, optionally sorted.
    pub async fn find_many<T>(
        &self,
        name: &str,
        filter: Document,
        sort: Option<Document>,
    ) -> Result<Vec<T>, AppError>
    where
        T: DeserializeOwned + Send + Sync,
    {
        let collection = self.collection::<T>(name);
        let cursor = match sort {
            Some(sort) => collection.find(filter).sort(sort).await?,
            None => collection.find(filter).await?,
        };
        Ok(cursor.try_collect().await?)
    }

    pub async fn count(&self, name: &str, filter: Document) -> Result<u64, AppError> {
        Ok(self.collection::<Document>(name).count_documents(filter).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_plan_covers_unique_constraints() {
        let unique: Vec<(&str, Document)> = index_plan()
            .into_iter()
            .filter(|(_, _, unique)| *unique)
            .map(|(name, keys, _)| (name, keys))
            .collect();

        assert!(unique.contains(&(USERS, doc! { "email": 1 })));
        assert!(unique.contains(&(STUDENTS, doc! { "regNo": 1 })));
        assert!(unique.contains(&(STUDENTS, doc! { "nic": 1 })));
        assert!(unique.contains(&(INTERVIEWS, doc! { "companyID": 1, "studentID": 1 })));
        assert!(unique.contains(&(SHORTLISTS, doc! { "companyID": 1, "studentID": 1 })));
    }

    #[tokio::test]
    #[ignore] // Requires MongoDB to be running
    async fn test_mongodb_connection() {
        dotenv::dotenv().ok();
        let url = std::env::var("DATABASE_URL").unwrap_or_else(|_| "mongodb://localhost:27017".into());

        let db = MongoDB::new(&url, "industry_day_test").await;
        assert!(db.is_ok());
        assert!(db.unwrap().ping().await.is_ok());
    }
}
