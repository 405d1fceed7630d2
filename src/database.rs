// src/database.rs
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;
use std::path::PathBuf;
use tracing::info;

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct InterviewSessionRow {
    pub id: String,
    pub job_description: String,
    pub question_type: String,
    /// JSON-encoded list of question strings, in asking order
    pub questions: String,
    pub created_at: DateTime<Utc>,
}

impl InterviewSessionRow {
    pub fn question_list(&self) -> Result<Vec<String>> {
        serde_json::from_str(&self.questions).context("Failed to decode stored question list")
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct InterviewAnswerRow {
    pub session_id: String,
    pub question_index: i64,
    pub answer: String,
    pub score: i64,
    pub correctness: String,
    pub feedback: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct MemoryInteraction {
    pub id: i64,
    pub query: String,
    pub response: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug)]
pub struct DatabaseConfig {
    pub database_path: PathBuf,
    pub pool: Option<SqlitePool>,
}

impl DatabaseConfig {
    pub fn new(database_path: PathBuf) -> Self {
        Self {
            database_path,
            pool: None,
        }
    }

    /// Initialize the database connection pool
    pub async fn init_pool(&mut self) -> Result<()> {
        if let Some(parent) = self.database_path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .context("Failed to create database directory")?;
        }

        let database_url = format!("sqlite:{}?mode=rwc", self.database_path.display());

        let pool = SqlitePool::connect(&database_url)
            .await
            .context("Failed to connect to SQLite database")?;
        self.pool = Some(pool);

        info!("Database connection pool initialized: {}", database_url);
        Ok(())
    }

    /// Get the database pool
    pub fn pool(&self) -> Result<&SqlitePool> {
        self.pool.as_ref().ok_or_else(|| {
            anyhow::anyhow!("Database pool not initialized. Call init_pool() first.")
        })
    }

    /// Run database migrations
    pub async fn migrate(&self) -> Result<()> {
        run_migrations(self.pool()?).await
    }
}

/// Create the schema if it does not exist yet
pub async fn run_migrations(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS interview_sessions (
            id TEXT PRIMARY KEY,
            job_description TEXT NOT NULL,
            question_type TEXT NOT NULL,
            questions TEXT NOT NULL,
            created_at TEXT NOT NULL
        );
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS interview_answers (
            session_id TEXT NOT NULL,
            question_index INTEGER NOT NULL,
            answer TEXT NOT NULL,
            score INTEGER NOT NULL,
            correctness TEXT NOT NULL,
            feedback TEXT NOT NULL,
            created_at TEXT NOT NULL,
            PRIMARY KEY (session_id, question_index)
        );
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS memory_interactions (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            query TEXT NOT NULL,
            response TEXT NOT NULL,
            created_at TEXT NOT NULL
        );
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE INDEX IF NOT EXISTS idx_interview_answers_session
        ON interview_answers(session_id);
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE INDEX IF NOT EXISTS idx_memory_interactions_created
        ON memory_interactions(created_at);
        "#,
    )
    .execute(pool)
    .await?;

    info!("Database migrations completed successfully");
    Ok(())
}

pub struct SessionRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> SessionRepository<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Store a freshly started practice session
    pub async fn create(
        &self,
        id: &str,
        job_description: &str,
        question_type: &str,
        questions: &[String],
    ) -> Result<InterviewSessionRow> {
        let now = Utc::now();
        let encoded =
            serde_json::to_string(questions).context("Failed to encode question list")?;

        sqlx::query(
            r#"
            INSERT INTO interview_sessions (id, job_description, question_type, questions, created_at)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(id)
        .bind(job_description)
        .bind(question_type)
        .bind(&encoded)
        .bind(now)
        .execute(self.pool)
        .await?;

        info!("Created interview session: {}", id);

        Ok(InterviewSessionRow {
            id: id.to_string(),
            job_description: job_description.to_string(),
            question_type: question_type.to_string(),
            questions: encoded,
            created_at: now,
        })
    }

    /// Find a session by id
    pub async fn find(&self, id: &str) -> Result<Option<InterviewSessionRow>> {
        let session = sqlx::query_as::<_, InterviewSessionRow>(
            r#"
            SELECT id, job_description, question_type, questions, created_at
            FROM interview_sessions
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(session)
    }

    /// Record (or re-record) the answer for one question of a session
    pub async fn record_answer(
        &self,
        session_id: &str,
        question_index: i64,
        answer: &str,
        score: i64,
        correctness: &str,
        feedback: &str,
    ) -> Result<()> {
        sqlx::query(
            r#"
            INSERT OR REPLACE INTO interview_answers
                (session_id, question_index, answer, score, correctness, feedback, created_at)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(session_id)
        .bind(question_index)
        .bind(answer)
        .bind(score)
        .bind(correctness)
        .bind(feedback)
        .bind(Utc::now())
        .execute(self.pool)
        .await?;

        Ok(())
    }

    /// All recorded answers of a session, in question order
    pub async fn answers(&self, session_id: &str) -> Result<Vec<InterviewAnswerRow>> {
        let answers = sqlx::query_as::<_, InterviewAnswerRow>(
            r#"
            SELECT session_id, question_index, answer, score, correctness, feedback, created_at
            FROM interview_answers
            WHERE session_id = ?
            ORDER BY question_index ASC
            "#,
        )
        .bind(session_id)
        .fetch_all(self.pool)
        .await?;

        Ok(answers)
    }
}

pub struct MemoryRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> MemoryRepository<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Save one user-query/system-response pair
    pub async fn record(&self, query: &str, response: &str) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO memory_interactions (query, response, created_at)
            VALUES (?, ?, ?)
            "#,
        )
        .bind(query)
        .bind(response)
        .bind(Utc::now())
        .execute(self.pool)
        .await?;

        Ok(())
    }

    /// Most recent stored interactions matching the query text
    pub async fn find_related(&self, query: &str, limit: i64) -> Result<Vec<MemoryInteraction>> {
        let pattern = format!("%{}%", query);

        let interactions = sqlx::query_as::<_, MemoryInteraction>(
            r#"
            SELECT id, query, response, created_at
            FROM memory_interactions
            WHERE query LIKE ? OR response LIKE ?
            ORDER BY created_at DESC
            LIMIT ?
            "#,
        )
        .bind(&pattern)
        .bind(&pattern)
        .bind(limit)
        .fetch_all(self.pool)
        .await?;

        Ok(interactions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn test_pool() -> SqlitePool {
        let pool = SqlitePool::connect("sqlite::memory:")
            .await
            .expect("in-memory pool");
        run_migrations(&pool).await.expect("migrations");
        pool
    }

    #[tokio::test]
    async fn test_session_round_trip() {
        let pool = test_pool().await;
        let repo = SessionRepository::new(&pool);

        let questions = vec!["Q1".to_string(), "Q2".to_string()];
        repo.create("abc", "backend role", "behavioral", &questions)
            .await
            .unwrap();

        let session = repo.find("abc").await.unwrap().unwrap();
        assert_eq!(session.question_type, "behavioral");
        assert_eq!(session.question_list().unwrap(), questions);

        assert!(repo.find("missing").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_record_answer_replaces_on_same_index() {
        let pool = test_pool().await;
        let repo = SessionRepository::new(&pool);
        repo.create("s1", "jd", "technical", &["Q1".to_string()])
            .await
            .unwrap();

        repo.record_answer("s1", 0, "first try", 4, "partial", "ok")
            .await
            .unwrap();
        repo.record_answer("s1", 0, "second try", 8, "correct", "better")
            .await
            .unwrap();

        let answers = repo.answers("s1").await.unwrap();
        assert_eq!(answers.len(), 1);
        assert_eq!(answers[0].answer, "second try");
        assert_eq!(answers[0].score, 8);
    }

    #[tokio::test]
    async fn test_memory_find_related_matches_and_limits() {
        let pool = test_pool().await;
        let repo = MemoryRepository::new(&pool);

        for i in 0..5 {
            repo.record(&format!("rust engineer search {}", i), "Found 3 jobs")
                .await
                .unwrap();
        }
        repo.record("gardening tips", "Found 1 job").await.unwrap();

        let related = repo.find_related("rust engineer", 3).await.unwrap();
        assert_eq!(related.len(), 3);
        assert!(related.iter().all(|r| r.query.contains("rust engineer")));

        let none = repo.find_related("astronaut", 3).await.unwrap();
        assert!(none.is_empty());
    }
}
