// src/web/mod.rs
pub mod handlers;
pub mod types;

pub use types::*;

use crate::agents::ethics_auditor::SessionActivity;
use crate::agents::{
    CareerPlannerAgent, EthicsAuditorAgent, InterviewCoachAgent, PersonalizationAgent, SearchAgent,
    SkillAnalyzerAgent,
};
use crate::core::{ConfigManager, LlmClient, ServiceConfig};
use crate::database::DatabaseConfig;
use anyhow::Result;
use rocket::fairing::{Fairing, Info, Kind};
use rocket::http::{Header, Status};
use rocket::serde::json::Json;
use rocket::{catchers, get, options, post, routes, Request, Response, State};
use tracing::{error, info, warn};

// CORS Fairing
pub struct Cors;

#[rocket::async_trait]
impl Fairing for Cors {
    fn info(&self) -> Info {
        Info {
            name: "Add CORS headers to responses",
            kind: Kind::Response,
        }
    }

    async fn on_response<'r>(&self, _request: &'r Request<'_>, response: &mut Response<'r>) {
        response.set_header(Header::new("Access-Control-Allow-Origin", "*"));
        response.set_header(Header::new(
            "Access-Control-Allow-Methods",
            "POST, GET, PATCH, OPTIONS",
        ));
        response.set_header(Header::new("Access-Control-Allow-Headers", "*"));
        response.set_header(Header::new("Access-Control-Allow-Credentials", "true"));
    }
}

/// All agents, built once at startup and shared across requests.
/// Agents whose external service is not configured run in their
/// degraded (heuristic/fallback) mode instead of failing requests.
pub struct AgentRegistry {
    pub search: Option<SearchAgent>,
    pub personalization: PersonalizationAgent,
    pub skills: SkillAnalyzerAgent,
    pub planner: CareerPlannerAgent,
    pub coach: InterviewCoachAgent,
    pub ethics: EthicsAuditorAgent,
}

impl AgentRegistry {
    pub fn new(service: &ServiceConfig) -> Result<Self> {
        let search = match SearchAgent::new(service) {
            Ok(agent) => Some(agent),
            Err(e) => {
                warn!("Job search disabled: {}", e);
                None
            }
        };

        let llm = |feature: &str| match LlmClient::new(service) {
            Ok(client) => Some(client),
            Err(e) => {
                warn!("{} running without model access: {}", feature, e);
                None
            }
        };

        Ok(Self {
            search,
            personalization: PersonalizationAgent::new(llm("Bias auditing"))?,
            skills: SkillAnalyzerAgent::new(llm("Skill extraction")),
            planner: CareerPlannerAgent::new(llm("Career planning"))?,
            coach: InterviewCoachAgent::new(llm("Interview coaching")),
            ethics: EthicsAuditorAgent::new()?,
        })
    }
}

// Standard API Routes

#[post("/search", data = "<request>")]
pub async fn search_jobs(
    request: Json<StandardRequest<SearchRequest>>,
    agents: &State<AgentRegistry>,
    db_config: &State<DatabaseConfig>,
) -> Result<Json<DataResponse<SearchData>>, Json<StandardErrorResponse>> {
    handlers::search_jobs_handler(request, agents, db_config).await
}

#[post("/skills/extract", data = "<request>")]
pub async fn extract_skills(
    request: Json<StandardRequest<ExtractSkillsRequest>>,
    agents: &State<AgentRegistry>,
) -> Result<Json<DataResponse<ExtractedSkillsData>>, Json<StandardErrorResponse>> {
    handlers::extract_skills_handler(request, agents).await
}

#[post("/skills/analyze", data = "<request>")]
pub async fn analyze_skills(
    request: Json<StandardRequest<SkillAnalysisRequest>>,
    agents: &State<AgentRegistry>,
) -> Result<Json<DataResponse<SkillAnalysisData>>, Json<StandardErrorResponse>> {
    handlers::analyze_skills_handler(request, agents).await
}

#[post("/career/predict", data = "<request>")]
pub async fn predict_career(
    request: Json<StandardRequest<CareerPredictRequest>>,
    agents: &State<AgentRegistry>,
) -> Result<Json<DataResponse<CareerPredictData>>, Json<StandardErrorResponse>> {
    handlers::predict_career_handler(request, agents).await
}

#[post("/career/roadmap", data = "<request>")]
pub async fn career_roadmap(
    request: Json<StandardRequest<CareerRoadmapRequest>>,
    agents: &State<AgentRegistry>,
) -> Result<Json<DataResponse<crate::agents::career_planner::LearningRoadmap>>, Json<StandardErrorResponse>>
{
    handlers::career_roadmap_handler(request, agents).await
}

#[post("/interview/start", data = "<request>")]
pub async fn start_interview(
    request: Json<StandardRequest<StartInterviewRequest>>,
    agents: &State<AgentRegistry>,
    db_config: &State<DatabaseConfig>,
) -> Result<Json<DataResponse<InterviewStartData>>, Json<StandardErrorResponse>> {
    handlers::start_interview_handler(request, agents, db_config).await
}

#[get("/interview/tips?<kind>")]
pub async fn interview_tips(
    kind: Option<String>,
    agents: &State<AgentRegistry>,
) -> Json<DataResponse<Vec<String>>> {
    handlers::practice_tips_handler(kind, agents).await
}

#[get("/interview/<session_id>")]
pub async fn get_interview_session(
    session_id: String,
    db_config: &State<DatabaseConfig>,
) -> Result<Json<DataResponse<InterviewSessionData>>, Json<StandardErrorResponse>> {
    handlers::get_session_handler(session_id, db_config).await
}

#[post("/interview/<session_id>/answer", data = "<request>")]
pub async fn submit_answer(
    session_id: String,
    request: Json<StandardRequest<SubmitAnswerRequest>>,
    agents: &State<AgentRegistry>,
    db_config: &State<DatabaseConfig>,
) -> Result<Json<DataResponse<EvaluationData>>, Json<StandardErrorResponse>> {
    handlers::submit_answer_handler(session_id, request, agents, db_config).await
}

#[get("/interview/<session_id>/summary")]
pub async fn session_summary(
    session_id: String,
    db_config: &State<DatabaseConfig>,
) -> Result<Json<DataResponse<SessionSummaryData>>, Json<StandardErrorResponse>> {
    handlers::session_summary_handler(session_id, db_config).await
}

#[get("/interview/<session_id>/export")]
pub async fn export_session(
    session_id: String,
    db_config: &State<DatabaseConfig>,
) -> Result<CsvResponse, Json<StandardErrorResponse>> {
    handlers::export_session_handler(session_id, db_config).await
}

#[post("/ethics/resume", data = "<request>")]
pub async fn audit_resume(
    request: Json<StandardRequest<AuditResumeRequest>>,
    agents: &State<AgentRegistry>,
) -> Result<Json<DataResponse<crate::agents::ethics_auditor::ResumeAudit>>, Json<StandardErrorResponse>>
{
    handlers::audit_resume_handler(request, agents).await
}

#[post("/ethics/job", data = "<request>")]
pub async fn audit_job(
    request: Json<StandardRequest<AuditJobRequest>>,
    agents: &State<AgentRegistry>,
) -> Result<
    Json<DataResponse<crate::agents::ethics_auditor::JobDescriptionAudit>>,
    Json<StandardErrorResponse>,
> {
    handlers::audit_job_handler(request, agents).await
}

#[post("/ethics/explain", data = "<request>")]
pub async fn explain_decision(
    request: Json<StandardRequest<ExplainRequest>>,
    agents: &State<AgentRegistry>,
) -> Json<TextResponse> {
    handlers::explain_decision_handler(request, agents).await
}

#[post("/ethics/transparency", data = "<request>")]
pub async fn transparency_report(
    request: Json<StandardRequest<SessionActivity>>,
    agents: &State<AgentRegistry>,
) -> Json<TextResponse> {
    handlers::transparency_report_handler(request, agents).await
}

#[get("/health")]
pub async fn health() -> Json<TextResponse> {
    handlers::health_handler().await
}

#[options("/<_..>")]
pub async fn options() -> Status {
    Status::Ok
}

// Error catchers
#[rocket::catch(400)]
pub fn bad_request() -> Json<StandardErrorResponse> {
    Json(StandardErrorResponse::new(
        "Invalid request format".to_string(),
        "BAD_REQUEST".to_string(),
        vec![
            "Check your request JSON format".to_string(),
            "Verify all required fields are present".to_string(),
        ],
        None,
    ))
}

#[rocket::catch(500)]
pub fn internal_error() -> Json<StandardErrorResponse> {
    Json(StandardErrorResponse::new(
        "Internal server error".to_string(),
        "INTERNAL_ERROR".to_string(),
        vec![
            "Try again in a few moments".to_string(),
            "Contact support if the problem persists".to_string(),
        ],
        None,
    ))
}

// Main server start function
pub async fn start_web_server(config: ConfigManager, port: u16) -> Result<()> {
    let agents = AgentRegistry::new(&config.service)?;

    let mut db_config = DatabaseConfig::new(config.environment.database_path.clone());

    if let Err(e) = db_config.init_pool().await {
        error!("Failed to initialize database: {}", e);
        return Err(e);
    }

    if let Err(e) = db_config.migrate().await {
        error!("Failed to run database migrations: {}", e);
        return Err(e);
    }

    info!("Starting JobPilot career assistant API server");
    info!("Database: {}", db_config.database_path.display());
    info!("All endpoints use the standard response format with conversation_id support");

    let figment = rocket::Config::figment()
        .merge(("port", port))
        .merge(("address", "0.0.0.0"));

    rocket::custom(figment)
        .attach(Cors)
        .manage(agents)
        .manage(db_config)
        .register("/api", catchers![bad_request, internal_error])
        .mount(
            "/api",
            routes![
                search_jobs,
                extract_skills,
                analyze_skills,
                predict_career,
                career_roadmap,
                start_interview,
                interview_tips,
                get_interview_session,
                submit_answer,
                session_summary,
                export_session,
                audit_resume,
                audit_job,
                explain_decision,
                transparency_report,
                health,
                options,
            ],
        )
        .launch()
        .await
        .map_err(|e| anyhow::anyhow!("Server failed to launch: {}", e))?;

    Ok(())
}
