// src/web/handlers/interview_handlers.rs
use anyhow::{Context, Result};
use rocket::serde::json::Json;
use rocket::State;
use sqlx::SqlitePool;
use tracing::{error, info};
use uuid::Uuid;

use crate::database::{DatabaseConfig, InterviewAnswerRow, InterviewSessionRow, SessionRepository};
use crate::utils::normalize_question_kind;
use crate::web::types::{
    CsvResponse, DataResponse, EvaluationData, InterviewSessionData, InterviewStartData,
    SessionAnswer, SessionSummaryData, StandardErrorResponse, StandardRequest,
    StartInterviewRequest, SubmitAnswerRequest, WithConversationId,
};
use crate::web::AgentRegistry;

fn database_error(conversation_id: Option<String>) -> Json<StandardErrorResponse> {
    Json(StandardErrorResponse::new(
        "Database connection failed".to_string(),
        "DATABASE_ERROR".to_string(),
        vec!["Try again in a few moments".to_string()],
        conversation_id,
    ))
}

fn session_not_found(session_id: &str) -> Json<StandardErrorResponse> {
    Json(StandardErrorResponse::new(
        format!("Interview session not found: {}", session_id),
        "SESSION_NOT_FOUND".to_string(),
        vec!["Start a new session with the interview start endpoint".to_string()],
        None,
    ))
}

async fn load_session(
    pool: &SqlitePool,
    session_id: &str,
) -> Result<Option<(InterviewSessionRow, Vec<String>)>> {
    let repo = SessionRepository::new(pool);

    let session = match repo.find(session_id).await? {
        Some(session) => session,
        None => return Ok(None),
    };

    let questions = session.question_list()?;
    Ok(Some((session, questions)))
}

pub async fn start_interview_handler(
    request: Json<StandardRequest<StartInterviewRequest>>,
    agents: &State<AgentRegistry>,
    db_config: &State<DatabaseConfig>,
) -> Result<Json<DataResponse<InterviewStartData>>, Json<StandardErrorResponse>> {
    let conversation_id = request.conversation_id();

    if request.data.job_description.trim().is_empty() {
        return Err(Json(StandardErrorResponse::new(
            "Please provide a job description first".to_string(),
            "INVALID_REQUEST".to_string(),
            vec!["The questions are generated from the job description".to_string()],
            conversation_id,
        )));
    }

    let question_type = normalize_question_kind(request.data.question_type.as_deref());
    let count = request.data.count.unwrap_or(5).clamp(1, 10);

    let questions = agents
        .coach
        .generate_questions(&request.data.job_description, &question_type, count)
        .await;

    let pool = match db_config.pool() {
        Ok(pool) => pool,
        Err(e) => {
            error!("Database connection failed: {}", e);
            return Err(database_error(conversation_id));
        }
    };

    let session_id = Uuid::new_v4().to_string();

    if let Err(e) = SessionRepository::new(pool)
        .create(
            &session_id,
            &request.data.job_description,
            &question_type,
            &questions,
        )
        .await
    {
        error!("Failed to store interview session: {}", e);
        return Err(database_error(conversation_id));
    }

    info!(
        "Started interview session {} with {} {} questions",
        session_id,
        questions.len(),
        question_type
    );

    let tips = agents.coach.practice_tips(&question_type);

    Ok(Json(DataResponse::success(
        format!("Prepared {} {} questions", questions.len(), question_type),
        InterviewStartData {
            session_id,
            question_type,
            questions,
            tips,
        },
        conversation_id,
    )))
}

pub async fn get_session_handler(
    session_id: String,
    db_config: &State<DatabaseConfig>,
) -> Result<Json<DataResponse<InterviewSessionData>>, Json<StandardErrorResponse>> {
    let pool = match db_config.pool() {
        Ok(pool) => pool,
        Err(e) => {
            error!("Database connection failed: {}", e);
            return Err(database_error(None));
        }
    };

    let (session, questions) = match load_session(pool, &session_id).await {
        Ok(Some(loaded)) => loaded,
        Ok(None) => return Err(session_not_found(&session_id)),
        Err(e) => {
            error!("Failed to load session {}: {}", session_id, e);
            return Err(database_error(None));
        }
    };

    let answer_rows = match SessionRepository::new(pool).answers(&session_id).await {
        Ok(rows) => rows,
        Err(e) => {
            error!("Failed to load answers for {}: {}", session_id, e);
            return Err(database_error(None));
        }
    };

    let answers = to_session_answers(&answer_rows, &questions);
    let current_question = next_unanswered(&answer_rows, questions.len());

    Ok(Json(DataResponse::success(
        "Interview session loaded".to_string(),
        InterviewSessionData {
            session_id,
            question_type: session.question_type,
            questions,
            answers,
            current_question,
        },
        None,
    )))
}

pub async fn submit_answer_handler(
    session_id: String,
    request: Json<StandardRequest<SubmitAnswerRequest>>,
    agents: &State<AgentRegistry>,
    db_config: &State<DatabaseConfig>,
) -> Result<Json<DataResponse<EvaluationData>>, Json<StandardErrorResponse>> {
    let conversation_id = request.conversation_id();

    if request.data.answer.trim().is_empty() {
        return Err(Json(StandardErrorResponse::new(
            "Please provide an answer first".to_string(),
            "INVALID_REQUEST".to_string(),
            vec!["Submit the answer text to evaluate".to_string()],
            conversation_id,
        )));
    }

    let pool = match db_config.pool() {
        Ok(pool) => pool,
        Err(e) => {
            error!("Database connection failed: {}", e);
            return Err(database_error(conversation_id));
        }
    };

    let (session, questions) = match load_session(pool, &session_id).await {
        Ok(Some(loaded)) => loaded,
        Ok(None) => return Err(session_not_found(&session_id)),
        Err(e) => {
            error!("Failed to load session {}: {}", session_id, e);
            return Err(database_error(conversation_id));
        }
    };

    let question_index = request.data.question_index;
    let question = match questions.get(question_index) {
        Some(question) => question.clone(),
        None => {
            return Err(Json(StandardErrorResponse::new(
                format!(
                    "Question index {} is out of range (session has {} questions)",
                    question_index,
                    questions.len()
                ),
                "INVALID_QUESTION_INDEX".to_string(),
                vec!["Use an index from the session's question list".to_string()],
                conversation_id,
            )));
        }
    };

    let evaluation = agents
        .coach
        .evaluate_answer(&question, &request.data.answer, &session.job_description)
        .await;

    if let Err(e) = SessionRepository::new(pool)
        .record_answer(
            &session_id,
            question_index as i64,
            &request.data.answer,
            evaluation.score,
            &evaluation.is_correct,
            &evaluation.feedback,
        )
        .await
    {
        error!("Failed to record answer for {}: {}", session_id, e);
        return Err(database_error(conversation_id));
    }

    Ok(Json(DataResponse::success(
        format!("Answer scored {}/10", evaluation.score),
        EvaluationData {
            question_index,
            evaluation,
        },
        conversation_id,
    )))
}

pub async fn session_summary_handler(
    session_id: String,
    db_config: &State<DatabaseConfig>,
) -> Result<Json<DataResponse<SessionSummaryData>>, Json<StandardErrorResponse>> {
    let pool = match db_config.pool() {
        Ok(pool) => pool,
        Err(e) => {
            error!("Database connection failed: {}", e);
            return Err(database_error(None));
        }
    };

    let (_, questions) = match load_session(pool, &session_id).await {
        Ok(Some(loaded)) => loaded,
        Ok(None) => return Err(session_not_found(&session_id)),
        Err(e) => {
            error!("Failed to load session {}: {}", session_id, e);
            return Err(database_error(None));
        }
    };

    let answer_rows = match SessionRepository::new(pool).answers(&session_id).await {
        Ok(rows) => rows,
        Err(e) => {
            error!("Failed to load answers for {}: {}", session_id, e);
            return Err(database_error(None));
        }
    };

    Ok(Json(DataResponse::success(
        "Session summary".to_string(),
        summarize(&answer_rows, questions.len()),
        None,
    )))
}

pub async fn export_session_handler(
    session_id: String,
    db_config: &State<DatabaseConfig>,
) -> Result<CsvResponse, Json<StandardErrorResponse>> {
    let pool = match db_config.pool() {
        Ok(pool) => pool,
        Err(e) => {
            error!("Database connection failed: {}", e);
            return Err(database_error(None));
        }
    };

    let (_, questions) = match load_session(pool, &session_id).await {
        Ok(Some(loaded)) => loaded,
        Ok(None) => return Err(session_not_found(&session_id)),
        Err(e) => {
            error!("Failed to load session {}: {}", session_id, e);
            return Err(database_error(None));
        }
    };

    let answer_rows = match SessionRepository::new(pool).answers(&session_id).await {
        Ok(rows) => rows,
        Err(e) => {
            error!("Failed to load answers for {}: {}", session_id, e);
            return Err(database_error(None));
        }
    };

    match write_transcript_csv(&questions, &answer_rows) {
        Ok(data) => Ok(CsvResponse::new(
            data,
            format!("interview_{}.csv", session_id),
        )),
        Err(e) => {
            error!("Failed to build CSV export for {}: {}", session_id, e);
            Err(Json(StandardErrorResponse::new(
                "Failed to build transcript export".to_string(),
                "EXPORT_FAILED".to_string(),
                vec!["Try again in a few moments".to_string()],
                None,
            )))
        }
    }
}

pub async fn practice_tips_handler(
    kind: Option<String>,
    agents: &State<AgentRegistry>,
) -> Json<DataResponse<Vec<String>>> {
    let question_type = normalize_question_kind(kind.as_deref());
    let tips = agents.coach.practice_tips(&question_type);

    Json(DataResponse::success(
        format!("Tips for {} questions", question_type),
        tips,
        None,
    ))
}

fn to_session_answers(rows: &[InterviewAnswerRow], questions: &[String]) -> Vec<SessionAnswer> {
    rows.iter()
        .map(|row| {
            let index = row.question_index as usize;
            SessionAnswer {
                question_index: index,
                question: questions.get(index).cloned().unwrap_or_default(),
                answer: row.answer.clone(),
                score: row.score,
                correctness: row.correctness.clone(),
                feedback: row.feedback.clone(),
            }
        })
        .collect()
}

fn next_unanswered(rows: &[InterviewAnswerRow], total_questions: usize) -> usize {
    (0..total_questions)
        .find(|i| !rows.iter().any(|row| row.question_index as usize == *i))
        .unwrap_or(total_questions)
}

fn summarize(rows: &[InterviewAnswerRow], total_questions: usize) -> SessionSummaryData {
    let answered = rows.len();

    let average_score = if answered > 0 {
        rows.iter().map(|row| row.score as f64).sum::<f64>() / answered as f64
    } else {
        0.0
    };

    let completion_percent = if total_questions > 0 {
        answered as f64 / total_questions as f64 * 100.0
    } else {
        0.0
    };

    SessionSummaryData {
        questions_answered: answered,
        total_questions,
        average_score,
        completion_percent,
    }
}

fn write_transcript_csv(questions: &[String], rows: &[InterviewAnswerRow]) -> Result<Vec<u8>> {
    let mut writer = csv::Writer::from_writer(Vec::new());

    writer
        .write_record(["question_number", "question", "answer", "score", "correctness"])
        .context("Failed to write CSV header")?;

    for row in rows {
        let index = row.question_index as usize;
        writer
            .write_record([
                (index + 1).to_string(),
                questions.get(index).cloned().unwrap_or_default(),
                row.answer.clone(),
                row.score.to_string(),
                row.correctness.clone(),
            ])
            .context("Failed to write CSV record")?;
    }

    writer
        .into_inner()
        .map_err(|e| anyhow::anyhow!("Failed to finish CSV transcript: {}", e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn answer_row(index: i64, score: i64) -> InterviewAnswerRow {
        InterviewAnswerRow {
            session_id: "s".to_string(),
            question_index: index,
            answer: format!("answer {}", index),
            score,
            correctness: "correct".to_string(),
            feedback: "fine".to_string(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_summarize_average_and_completion() {
        let rows = vec![answer_row(0, 8), answer_row(1, 6)];
        let summary = summarize(&rows, 5);

        assert_eq!(summary.questions_answered, 2);
        assert_eq!(summary.total_questions, 5);
        assert_eq!(summary.average_score, 7.0);
        assert_eq!(summary.completion_percent, 40.0);
    }

    #[test]
    fn test_summarize_empty_session() {
        let summary = summarize(&[], 0);
        assert_eq!(summary.average_score, 0.0);
        assert_eq!(summary.completion_percent, 0.0);
    }

    #[test]
    fn test_next_unanswered_skips_answered_questions() {
        let rows = vec![answer_row(0, 5), answer_row(2, 5)];
        assert_eq!(next_unanswered(&rows, 4), 1);

        let rows = vec![answer_row(0, 5), answer_row(1, 5)];
        assert_eq!(next_unanswered(&rows, 2), 2);
    }

    #[test]
    fn test_write_transcript_csv_includes_question_text() {
        let questions = vec!["Why backend?".to_string(), "Why Rust?".to_string()];
        let rows = vec![answer_row(1, 9)];

        let data = write_transcript_csv(&questions, &rows).unwrap();
        let text = String::from_utf8(data).unwrap();

        assert!(text.starts_with("question_number,question,answer,score,correctness"));
        assert!(text.contains("2,Why Rust?,answer 1,9,correct"));
    }
}
