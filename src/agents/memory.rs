// src/agents/memory.rs
use sqlx::SqlitePool;
use tracing::warn;

use crate::database::MemoryRepository;

const CONTEXT_LIMIT: i64 = 3;

/// Long-term memory over past interactions. Every operation degrades
/// silently: a storage failure yields empty context or a no-op, never an
/// error surfaced to the caller.
pub struct MemoryAgent<'a> {
    pool: Option<&'a SqlitePool>,
}

impl<'a> MemoryAgent<'a> {
    pub fn new(pool: Option<&'a SqlitePool>) -> Self {
        Self { pool }
    }

    /// Context lines from previous related interactions, empty when there
    /// are none or the store is unavailable
    pub async fn get_context(&self, query: &str) -> String {
        let pool = match self.pool {
            Some(pool) => pool,
            None => return String::new(),
        };

        match MemoryRepository::new(pool)
            .find_related(query, CONTEXT_LIMIT)
            .await
        {
            Ok(interactions) => interactions
                .iter()
                .map(|i| format!("- {}: {}", i.query, i.response))
                .collect::<Vec<_>>()
                .join("\n"),
            Err(e) => {
                warn!("Memory lookup failed: {}", e);
                String::new()
            }
        }
    }

    /// Save one interaction for future context lookups
    pub async fn save_interaction(&self, user_query: &str, system_response: &str) {
        let pool = match self.pool {
            Some(pool) => pool,
            None => return,
        };

        if let Err(e) = MemoryRepository::new(pool)
            .record(user_query, system_response)
            .await
        {
            warn!("Failed to save interaction: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::run_migrations;

    #[tokio::test]
    async fn test_context_round_trip() {
        let pool = SqlitePool::connect("sqlite::memory:").await.unwrap();
        run_migrations(&pool).await.unwrap();

        let agent = MemoryAgent::new(Some(&pool));
        agent
            .save_interaction("data engineer jobs", "Found 5 jobs")
            .await;

        let context = agent.get_context("data engineer").await;
        assert!(context.contains("- data engineer jobs: Found 5 jobs"));

        assert_eq!(agent.get_context("unrelated topic").await, "");
    }

    #[tokio::test]
    async fn test_disabled_memory_is_silent() {
        let agent = MemoryAgent::new(None);
        agent.save_interaction("q", "r").await;
        assert_eq!(agent.get_context("q").await, "");
    }
}
