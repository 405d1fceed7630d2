// src/web/handlers/career_handlers.rs
use rocket::serde::json::Json;
use rocket::State;
use tracing::info;

use crate::agents::career_planner::LearningRoadmap;
use crate::agents::skill_analyzer::SkillSet;
use crate::utils::clamp_score;
use crate::web::types::{
    CareerPredictData, CareerPredictRequest, CareerRoadmapRequest, DataResponse,
    StandardErrorResponse, StandardRequest, WithConversationId,
};
use crate::web::AgentRegistry;

pub async fn predict_career_handler(
    request: Json<StandardRequest<CareerPredictRequest>>,
    agents: &State<AgentRegistry>,
) -> Result<Json<DataResponse<CareerPredictData>>, Json<StandardErrorResponse>> {
    let conversation_id = request.conversation_id();

    if request.data.current_role.trim().is_empty() || request.data.target_role.trim().is_empty() {
        return Err(Json(StandardErrorResponse::new(
            "Both current and target roles are required".to_string(),
            "INVALID_REQUEST".to_string(),
            vec![
                "Provide current_role with your present title".to_string(),
                "Provide target_role with the title you are aiming for".to_string(),
            ],
            conversation_id,
        )));
    }

    let skills = parse_skills_text(request.data.skills_text.as_deref().unwrap_or(""));

    let career_path = agents
        .planner
        .predict_path(
            &request.data.current_role,
            &request.data.target_role,
            &skills,
        )
        .await;

    let bridge_roles = agents
        .planner
        .recommend_bridge_roles(
            &request.data.current_role,
            &request.data.target_role,
            &skills,
        )
        .await;

    let networking = agents
        .planner
        .networking_strategy(
            &request.data.target_role,
            request.data.target_industry.as_deref().unwrap_or(""),
        )
        .await;

    info!(
        "Career prediction {} -> {}: feasibility {}/10",
        request.data.current_role, request.data.target_role, career_path.feasibility_score
    );

    Ok(Json(DataResponse::success(
        "Career analysis complete".to_string(),
        CareerPredictData {
            career_path,
            bridge_roles,
            networking,
        },
        conversation_id,
    )))
}

pub async fn career_roadmap_handler(
    request: Json<StandardRequest<CareerRoadmapRequest>>,
    agents: &State<AgentRegistry>,
) -> Result<Json<DataResponse<LearningRoadmap>>, Json<StandardErrorResponse>> {
    let conversation_id = request.conversation_id();

    if request.data.current_role.trim().is_empty() || request.data.target_role.trim().is_empty() {
        return Err(Json(StandardErrorResponse::new(
            "Both current and target roles are required".to_string(),
            "INVALID_REQUEST".to_string(),
            vec!["Provide current_role and target_role".to_string()],
            conversation_id,
        )));
    }

    let roadmap = agents
        .planner
        .skill_roadmap(
            &request.data.current_role,
            &request.data.target_role,
            request.data.current_skills_text.as_deref().unwrap_or(""),
            clamp_score(request.data.feasibility_score, 1, 10),
        )
        .await;

    Ok(Json(DataResponse::success(
        "Learning roadmap generated".to_string(),
        roadmap,
        conversation_id,
    )))
}

/// Free-form comma-separated skills become a skill set: the first five
/// count as technical, the next three as soft.
fn parse_skills_text(text: &str) -> SkillSet {
    let items: Vec<String> = text
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect();

    let technical = items.iter().take(5).cloned().collect();
    let soft = if items.len() > 5 {
        items[5..].iter().take(3).cloned().collect()
    } else {
        Vec::new()
    };

    SkillSet {
        technical,
        soft,
        domain: Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_skills_text_splits_and_buckets() {
        let skills = parse_skills_text("Python, React, Git, SQL, Docker, Teamwork, Mentoring");
        assert_eq!(skills.technical.len(), 5);
        assert_eq!(skills.soft, vec!["Teamwork", "Mentoring"]);
        assert!(skills.domain.is_empty());
    }

    #[test]
    fn test_parse_skills_text_handles_empty_input() {
        let skills = parse_skills_text("");
        assert_eq!(skills.total(), 0);

        let skills = parse_skills_text(" , ,, ");
        assert_eq!(skills.total(), 0);
    }
}
