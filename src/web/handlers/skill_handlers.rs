// src/web/handlers/skill_handlers.rs
use rocket::serde::json::Json;
use rocket::State;
use tracing::info;

use crate::web::types::{
    DataResponse, ExtractSkillsRequest, ExtractedSkillsData, SkillAnalysisData,
    SkillAnalysisRequest, StandardErrorResponse, StandardRequest, WithConversationId,
};
use crate::web::AgentRegistry;

pub async fn extract_skills_handler(
    request: Json<StandardRequest<ExtractSkillsRequest>>,
    agents: &State<AgentRegistry>,
) -> Result<Json<DataResponse<ExtractedSkillsData>>, Json<StandardErrorResponse>> {
    let conversation_id = request.conversation_id();

    if request.data.text.trim().is_empty() {
        return Err(Json(StandardErrorResponse::new(
            "No text provided".to_string(),
            "INVALID_REQUEST".to_string(),
            vec!["Provide the text to extract skills from".to_string()],
            conversation_id,
        )));
    }

    let source_type = request
        .data
        .source_type
        .clone()
        .unwrap_or_else(|| "resume".to_string());

    let skills = agents
        .skills
        .extract_skills(&request.data.text, &source_type)
        .await;

    Ok(Json(DataResponse::success(
        format!("Extracted {} skills", skills.total()),
        ExtractedSkillsData {
            source_type,
            skills,
        },
        conversation_id,
    )))
}

pub async fn analyze_skills_handler(
    request: Json<StandardRequest<SkillAnalysisRequest>>,
    agents: &State<AgentRegistry>,
) -> Result<Json<DataResponse<SkillAnalysisData>>, Json<StandardErrorResponse>> {
    let conversation_id = request.conversation_id();

    if request.data.resume_text.trim().is_empty() || request.data.job_text.trim().is_empty() {
        return Err(Json(StandardErrorResponse::new(
            "Both resume and target job description are required".to_string(),
            "INVALID_REQUEST".to_string(),
            vec![
                "Provide resume_text with your skills and experience".to_string(),
                "Provide job_text with the posting you are targeting".to_string(),
            ],
            conversation_id,
        )));
    }

    let resume_skills = agents
        .skills
        .extract_skills(&request.data.resume_text, "resume")
        .await;
    let job_skills = agents
        .skills
        .extract_skills(&request.data.job_text, "job_description")
        .await;

    let analysis = agents.skills.analyze_gaps(&resume_skills, &job_skills);

    // Recommendations cover the gaps that actually block the application
    let mut priority_gaps = analysis.gaps.critical.clone();
    priority_gaps.extend(analysis.gaps.moderate.iter().cloned());

    let recommendations = agents.skills.recommend_resources(&priority_gaps).await;
    let roadmap = agents.skills.quarterly_roadmap(&recommendations);

    info!(
        "Skill analysis found {} priority gaps ({}% match)",
        priority_gaps.len(),
        analysis.match_percentage
    );

    Ok(Json(DataResponse::success(
        "Skill gap analysis completed".to_string(),
        SkillAnalysisData {
            analysis,
            recommendations,
            roadmap,
        },
        conversation_id,
    )))
}
