// src/web/types.rs
use rocket::http::ContentType;
use rocket::response::{self, Responder};
use rocket::serde::{Deserialize, Serialize};
use rocket::{Request, Response};

use crate::agents::career_planner::{BridgeRole, CareerPath, NetworkingStrategy};
use crate::agents::interview_coach::AnswerEvaluation;
use crate::agents::personalization::ProcessedJob;
use crate::agents::skill_analyzer::{CourseRecommendation, GapAnalysis, QuarterlyPlan, SkillSet};

// ===== Standard response envelope =====

#[derive(Serialize)]
#[serde(crate = "rocket::serde", rename_all = "lowercase")]
pub enum ResponseType {
    Text,
    Data,
    Error,
}

#[derive(Serialize)]
#[serde(crate = "rocket::serde")]
pub struct TextResponse {
    #[serde(rename = "type")]
    pub response_type: ResponseType,
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub conversation_id: Option<String>,
}

#[derive(Serialize)]
#[serde(crate = "rocket::serde")]
pub struct DataResponse<T> {
    #[serde(rename = "type")]
    pub response_type: ResponseType,
    pub success: bool,
    pub message: String,
    pub data: T,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub conversation_id: Option<String>,
}

#[derive(Serialize)]
#[serde(crate = "rocket::serde")]
pub struct StandardErrorResponse {
    #[serde(rename = "type")]
    pub response_type: ResponseType,
    pub success: bool,
    pub error: String,
    pub error_code: String,
    pub suggestions: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub conversation_id: Option<String>,
}

impl TextResponse {
    pub fn success(message: String, conversation_id: Option<String>) -> Self {
        Self {
            response_type: ResponseType::Text,
            success: true,
            message,
            conversation_id,
        }
    }
}

impl<T> DataResponse<T> {
    pub fn success(message: String, data: T, conversation_id: Option<String>) -> Self {
        Self {
            response_type: ResponseType::Data,
            success: true,
            message,
            data,
            conversation_id,
        }
    }
}

impl StandardErrorResponse {
    pub fn new(
        error: String,
        error_code: String,
        suggestions: Vec<String>,
        conversation_id: Option<String>,
    ) -> Self {
        Self {
            response_type: ResponseType::Error,
            success: false,
            error,
            error_code,
            suggestions,
            conversation_id,
        }
    }
}

// Request wrapper with conversation_id support
#[derive(Deserialize)]
#[serde(crate = "rocket::serde")]
pub struct StandardRequest<T> {
    #[serde(flatten)]
    pub data: T,
    pub conversation_id: Option<String>,
}

pub trait WithConversationId {
    fn conversation_id(&self) -> Option<String>;
}

impl<T> WithConversationId for StandardRequest<T> {
    fn conversation_id(&self) -> Option<String> {
        self.conversation_id.clone()
    }
}

// ===== CSV download response =====

pub struct CsvResponse {
    pub data: Vec<u8>,
    pub filename: String,
}

impl CsvResponse {
    pub fn new(data: Vec<u8>, filename: String) -> Self {
        Self { data, filename }
    }
}

impl<'r> Responder<'r, 'static> for CsvResponse {
    fn respond_to(self, _: &'r Request<'_>) -> response::Result<'static> {
        Response::build()
            .header(ContentType::CSV)
            .raw_header(
                "Content-Disposition",
                format!("attachment; filename=\"{}\"", self.filename),
            )
            .sized_body(self.data.len(), std::io::Cursor::new(self.data))
            .ok()
    }
}

// ===== Request payloads =====

#[derive(Deserialize)]
#[serde(crate = "rocket::serde")]
pub struct SearchRequest {
    pub job_title: String,
    pub location: Option<String>,
    pub work_style: Option<String>,
    pub num_jobs: Option<usize>,
}

#[derive(Deserialize)]
#[serde(crate = "rocket::serde")]
pub struct ExtractSkillsRequest {
    pub text: String,
    pub source_type: Option<String>,
}

#[derive(Deserialize)]
#[serde(crate = "rocket::serde")]
pub struct SkillAnalysisRequest {
    pub resume_text: String,
    pub job_text: String,
}

#[derive(Deserialize)]
#[serde(crate = "rocket::serde")]
pub struct CareerPredictRequest {
    pub current_role: String,
    pub target_role: String,
    pub skills_text: Option<String>,
    pub target_industry: Option<String>,
}

#[derive(Deserialize)]
#[serde(crate = "rocket::serde")]
pub struct CareerRoadmapRequest {
    pub current_role: String,
    pub target_role: String,
    pub current_skills_text: Option<String>,
    pub feasibility_score: i64,
}

#[derive(Deserialize)]
#[serde(crate = "rocket::serde")]
pub struct StartInterviewRequest {
    pub job_description: String,
    pub question_type: Option<String>,
    pub count: Option<usize>,
}

#[derive(Deserialize)]
#[serde(crate = "rocket::serde")]
pub struct SubmitAnswerRequest {
    pub question_index: usize,
    pub answer: String,
}

#[derive(Deserialize)]
#[serde(crate = "rocket::serde")]
pub struct ExplainRequest {
    pub feature_type: String,
    pub value: String,
}

#[derive(Deserialize)]
#[serde(crate = "rocket::serde")]
pub struct AuditResumeRequest {
    pub resume_text: String,
}

#[derive(Deserialize)]
#[serde(crate = "rocket::serde")]
pub struct AuditJobRequest {
    pub job_description: String,
}

// ===== Response payloads =====

#[derive(Serialize)]
#[serde(crate = "rocket::serde")]
pub struct SearchData {
    pub context: String,
    pub jobs: Vec<ProcessedJob>,
    pub count: usize,
    pub status: String,
}

#[derive(Serialize)]
#[serde(crate = "rocket::serde")]
pub struct ExtractedSkillsData {
    pub source_type: String,
    pub skills: SkillSet,
}

#[derive(Serialize)]
#[serde(crate = "rocket::serde")]
pub struct SkillAnalysisData {
    pub analysis: GapAnalysis,
    pub recommendations: Vec<CourseRecommendation>,
    pub roadmap: QuarterlyPlan,
}

#[derive(Serialize)]
#[serde(crate = "rocket::serde")]
pub struct CareerPredictData {
    pub career_path: CareerPath,
    pub bridge_roles: Vec<BridgeRole>,
    pub networking: NetworkingStrategy,
}

#[derive(Serialize)]
#[serde(crate = "rocket::serde")]
pub struct InterviewStartData {
    pub session_id: String,
    pub question_type: String,
    pub questions: Vec<String>,
    pub tips: Vec<String>,
}

#[derive(Serialize)]
#[serde(crate = "rocket::serde")]
pub struct SessionAnswer {
    pub question_index: usize,
    pub question: String,
    pub answer: String,
    pub score: i64,
    pub correctness: String,
    pub feedback: String,
}

#[derive(Serialize)]
#[serde(crate = "rocket::serde")]
pub struct InterviewSessionData {
    pub session_id: String,
    pub question_type: String,
    pub questions: Vec<String>,
    pub answers: Vec<SessionAnswer>,
    pub current_question: usize,
}

#[derive(Serialize)]
#[serde(crate = "rocket::serde")]
pub struct EvaluationData {
    pub question_index: usize,
    pub evaluation: AnswerEvaluation,
}

#[derive(Serialize)]
#[serde(crate = "rocket::serde")]
pub struct SessionSummaryData {
    pub questions_answered: usize,
    pub total_questions: usize,
    pub average_score: f64,
    pub completion_percent: f64,
}
