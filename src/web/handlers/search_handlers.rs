// src/web/handlers/search_handlers.rs
use rocket::serde::json::Json;
use rocket::State;
use tracing::{info, warn};

use crate::agents::search::{JobSearchConfig, SearchOutcome};
use crate::agents::MemoryAgent;
use crate::database::DatabaseConfig;
use crate::web::types::{
    DataResponse, SearchData, SearchRequest, StandardErrorResponse, StandardRequest,
    WithConversationId,
};
use crate::web::AgentRegistry;

pub async fn search_jobs_handler(
    request: Json<StandardRequest<SearchRequest>>,
    agents: &State<AgentRegistry>,
    db_config: &State<DatabaseConfig>,
) -> Result<Json<DataResponse<SearchData>>, Json<StandardErrorResponse>> {
    let conversation_id = request.conversation_id();

    if request.data.job_title.trim().is_empty() {
        return Err(Json(StandardErrorResponse::new(
            "Job title must not be empty".to_string(),
            "INVALID_REQUEST".to_string(),
            vec!["Provide a job_title to search for".to_string()],
            conversation_id,
        )));
    }

    let pool = db_config.pool().ok();
    let memory = MemoryAgent::new(pool);

    let context = memory.get_context(&request.data.job_title).await;

    let config = JobSearchConfig {
        job_title: request.data.job_title.clone(),
        location: request.data.location.clone(),
        work_style: request.data.work_style.clone(),
        num_jobs: request.data.num_jobs.unwrap_or(5),
    };

    let outcome = match &agents.search {
        Some(search) => search.search(&config).await,
        None => {
            warn!("Search agent unavailable, returning empty result set");
            SearchOutcome {
                raw_results: Vec::new(),
                status: "no_results".to_string(),
                count: 0,
            }
        }
    };

    let jobs = agents
        .personalization
        .process_jobs(&outcome.raw_results)
        .await;

    memory
        .save_interaction(
            &request.data.job_title,
            &format!("Found {} jobs", jobs.len()),
        )
        .await;

    info!(
        "Search for '{}' returned {} processed jobs",
        request.data.job_title,
        jobs.len()
    );

    Ok(Json(DataResponse::success(
        format!("Found {} job postings", jobs.len()),
        SearchData {
            context,
            count: jobs.len(),
            jobs,
            status: outcome.status,
        },
        conversation_id,
    )))
}
