// src/web/handlers/ethics_handlers.rs
use rocket::serde::json::Json;
use rocket::State;
use tracing::info;

use crate::agents::ethics_auditor::{JobDescriptionAudit, ResumeAudit, SessionActivity};
use crate::web::types::{
    AuditJobRequest, AuditResumeRequest, DataResponse, ExplainRequest, StandardErrorResponse,
    StandardRequest, TextResponse, WithConversationId,
};
use crate::web::AgentRegistry;

pub async fn audit_resume_handler(
    request: Json<StandardRequest<AuditResumeRequest>>,
    agents: &State<AgentRegistry>,
) -> Result<Json<DataResponse<ResumeAudit>>, Json<StandardErrorResponse>> {
    let conversation_id = request.conversation_id();

    if request.data.resume_text.trim().is_empty() {
        return Err(Json(StandardErrorResponse::new(
            "No resume text provided".to_string(),
            "INVALID_REQUEST".to_string(),
            vec!["Provide resume_text to audit".to_string()],
            conversation_id,
        )));
    }

    let audit = agents.ethics.audit_resume(&request.data.resume_text);

    info!(
        "Resume audit score {} with {} findings",
        audit.score,
        audit.biases_found.len()
    );

    Ok(Json(DataResponse::success(
        format!("Resume audit completed: {}/100", audit.score),
        audit,
        conversation_id,
    )))
}

pub async fn audit_job_handler(
    request: Json<StandardRequest<AuditJobRequest>>,
    agents: &State<AgentRegistry>,
) -> Result<Json<DataResponse<JobDescriptionAudit>>, Json<StandardErrorResponse>> {
    let conversation_id = request.conversation_id();

    if request.data.job_description.trim().is_empty() {
        return Err(Json(StandardErrorResponse::new(
            "No job description provided".to_string(),
            "INVALID_REQUEST".to_string(),
            vec!["Provide job_description to audit".to_string()],
            conversation_id,
        )));
    }

    let audit = agents
        .ethics
        .audit_job_description(&request.data.job_description);

    info!(
        "Job description audit score {} with {} flags",
        audit.score,
        audit.flags.len()
    );

    Ok(Json(DataResponse::success(
        format!("Job description audit completed: {}/100", audit.score),
        audit,
        conversation_id,
    )))
}

pub async fn explain_decision_handler(
    request: Json<StandardRequest<ExplainRequest>>,
    agents: &State<AgentRegistry>,
) -> Json<TextResponse> {
    let conversation_id = request.conversation_id();

    let explanation = agents
        .ethics
        .explain_decision(&request.data.feature_type, &request.data.value);

    Json(TextResponse::success(explanation, conversation_id))
}

pub async fn transparency_report_handler(
    request: Json<StandardRequest<SessionActivity>>,
    agents: &State<AgentRegistry>,
) -> Json<TextResponse> {
    let conversation_id = request.conversation_id();

    let report = agents.ethics.transparency_report(&request.data);

    Json(TextResponse::success(report, conversation_id))
}
