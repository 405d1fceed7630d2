// src/agents/interview_coach.rs
use rand::seq::SliceRandom;
use serde::Serialize;
use tracing::{error, info, warn};

use crate::core::LlmClient;
use crate::utils::{bullet_item, clamp_score, strip_numbering, truncate_chars};

const QUESTION_TEMPERATURE: f32 = 0.9;
const EVALUATION_TEMPERATURE: f32 = 0.3;

const BEHAVIORAL_QUESTIONS: [&str; 10] = [
    "Tell me about a time when you faced a significant challenge at work. How did you handle it?",
    "Describe a situation where you had to work with a difficult team member.",
    "What's your greatest professional accomplishment and why?",
    "How do you prioritize tasks when you have multiple deadlines?",
    "Tell me about a time when you failed. What did you learn?",
    "Describe a situation where you had to adapt to significant changes at work.",
    "Give me an example of when you showed leadership without having formal authority.",
    "Tell me about a time you had to make a difficult decision with limited information.",
    "Describe a conflict you had with a colleague and how you resolved it.",
    "Share an example of when you went above and beyond what was expected of you.",
];

const TECHNICAL_QUESTIONS: [&str; 10] = [
    "Walk me through your approach to solving a complex technical problem.",
    "How would you optimize the performance of a slow application?",
    "Explain a technical concept you recently learned to someone non-technical.",
    "Describe your experience with version control and collaboration workflows.",
    "How do you ensure code quality in your projects?",
    "What's your approach to debugging when you encounter an error you've never seen before?",
    "Explain the trade-offs between different architectural patterns you've used.",
    "How do you stay updated with new technologies and best practices?",
    "Describe a time when you had to refactor legacy code.",
    "What testing strategies do you employ in your development process?",
];

const SITUATIONAL_QUESTIONS: [&str; 10] = [
    "If you joined a team with an ongoing project in crisis, what would be your first steps?",
    "How would you handle discovering a critical bug in production just before a major release?",
    "What would you do if you disagreed with your manager's technical decision?",
    "If you had two critical tasks with the same deadline, how would you prioritize?",
    "How would you approach learning a completely new technology stack for a project?",
    "What would you do if a team member consistently missed deadlines?",
    "How would you handle receiving harsh criticism on your work?",
    "If given an impossible deadline, how would you respond?",
    "What would you do if you noticed a colleague's code had security vulnerabilities?",
    "How would you balance technical debt with new feature development?",
];

#[derive(Debug, Clone, Default, Serialize)]
pub struct FeedbackDetails {
    pub strengths: Vec<String>,
    pub improvements: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct AnswerEvaluation {
    pub score: i64,
    pub feedback: String,
    pub is_correct: String,
    pub better_answer: String,
    pub detailed_analysis: FeedbackDetails,
}

/// Generates interview questions for a job description and scores answers.
pub struct InterviewCoachAgent {
    llm: Option<LlmClient>,
}

impl InterviewCoachAgent {
    pub fn new(llm: Option<LlmClient>) -> Self {
        Self { llm }
    }

    /// Generate interview questions based on a job description. Falls back
    /// to the built-in question bank when the model fails or under-delivers.
    pub async fn generate_questions(
        &self,
        job_description: &str,
        question_type: &str,
        count: usize,
    ) -> Vec<String> {
        let llm = match &self.llm {
            Some(llm) => llm,
            None => return fallback_questions(question_type, count),
        };

        let system_prompt = format!(
            r#"You are an expert interview coach. Generate EXACTLY {count} UNIQUE {kind} interview questions
based on the following job description. Make questions realistic, diverse, and relevant to the role.

For behavioral questions, focus on competencies like: leadership, problem-solving, teamwork, conflict resolution, adaptability.
For technical questions, focus on specific skills, technologies, and problem-solving approaches mentioned in the job.
For situational questions, create realistic scenarios the candidate might face in this specific role.

IMPORTANT: Generate {count} DIFFERENT questions. Do NOT repeat questions.

Return ONLY the questions, one per line, numbered 1-{count}."#,
            count = count,
            kind = question_type
        );

        // Limit input to avoid token limits
        let user_prompt = format!(
            "Job Description:\n{}",
            truncate_chars(job_description, 1500)
        );

        info!("Generating {} {} questions", count, question_type);

        match llm
            .complete(Some(&system_prompt), &user_prompt, QUESTION_TEMPERATURE)
            .await
        {
            Ok(reply) => {
                let questions = parse_questions(&reply);
                if questions.len() >= count {
                    questions.into_iter().take(count).collect()
                } else {
                    warn!(
                        "Only got {} questions from the model, using fallbacks",
                        questions.len()
                    );
                    fallback_questions(question_type, count)
                }
            }
            Err(e) => {
                error!("Error generating questions: {}", e);
                fallback_questions(question_type, count)
            }
        }
    }

    /// Evaluate an interview answer against the question and job context
    pub async fn evaluate_answer(
        &self,
        question: &str,
        answer: &str,
        job_description: &str,
    ) -> AnswerEvaluation {
        let llm = match &self.llm {
            Some(llm) => llm,
            None => return evaluation_fallback("model not configured"),
        };

        let system_prompt = r#"You are an expert interview coach evaluating candidate answers.

Analyze the answer thoroughly and provide:
1. A score from 1-10 (be accurate - give low scores for poor/incorrect answers)
2. Whether the answer is correct/incorrect for factual questions
3. Specific strengths (what they did well)
4. Specific improvements needed
5. For technical questions: provide the correct/complete answer if theirs was wrong
6. STAR method adherence (for behavioral questions)

Be honest and direct - if the answer is wrong, say it's wrong and explain why."#;

        let user_prompt = format!(
            r#"Question: {}

Answer: {}

Job Context: {}

Evaluate this answer thoroughly and return feedback in this format:

Score: [1-10]

Correctness: [Correct/Partially Correct/Incorrect - explain briefly]

Strengths:
- [strength 1]
- [strength 2]

Improvements:
- [improvement 1]
- [improvement 2]

Better Answer: [For technical/factual questions: provide a complete, correct answer. For behavioral: provide example of what a strong answer would include]

STAR Method: [Yes/No/Partial/Not Applicable - explain]"#,
            question,
            answer,
            truncate_chars(job_description, 500)
        );

        match llm
            .complete(Some(system_prompt), &user_prompt, EVALUATION_TEMPERATURE)
            .await
        {
            Ok(reply) => parse_evaluation(&reply),
            Err(e) => {
                error!("Error evaluating answer: {}", e);
                evaluation_fallback(&e.to_string())
            }
        }
    }

    /// General tips for answering the given question type
    pub fn practice_tips(&self, question_type: &str) -> Vec<String> {
        let tips: &[&str] = match question_type {
            "technical" => &[
                "Think out loud to show your problem-solving process",
                "Ask clarifying questions if needed",
                "Discuss trade-offs between different approaches",
                "Mention edge cases you'd consider",
                "Be honest if you don't know something",
            ],
            "situational" => &[
                "Take a moment to think before answering",
                "Explain your reasoning step-by-step",
                "Consider company values in your response",
                "Show awareness of different perspectives",
                "Demonstrate leadership and initiative",
            ],
            _ => &[
                "Use the STAR method: Situation, Task, Action, Result",
                "Be specific with examples from your experience",
                "Quantify your impact with numbers when possible",
                "Keep answers concise (1-2 minutes)",
                "Focus on YOUR actions, not just the team's",
            ],
        };

        tips.iter().map(|t| t.to_string()).collect()
    }
}

/// Keep numbered lines, strip the numbering, drop fragments
pub fn parse_questions(text: &str) -> Vec<String> {
    text.lines()
        .map(|line| line.trim())
        .filter(|line| {
            !line.is_empty() && line.chars().take(3).any(|c| c.is_ascii_digit())
        })
        .map(strip_numbering)
        .filter(|q| q.len() > 10)
        .collect()
}

/// Shuffled questions from the built-in bank for the question type
pub fn fallback_questions(question_type: &str, count: usize) -> Vec<String> {
    let bank: &[&str] = match question_type {
        "technical" => &TECHNICAL_QUESTIONS,
        "situational" => &SITUATIONAL_QUESTIONS,
        _ => &BEHAVIORAL_QUESTIONS,
    };

    let mut questions: Vec<String> = bank.iter().map(|q| q.to_string()).collect();
    questions.shuffle(&mut rand::thread_rng());
    questions.truncate(count);
    questions
}

/// Parse the structured feedback reply into an evaluation record
pub fn parse_evaluation(text: &str) -> AnswerEvaluation {
    let lines: Vec<&str> = text.lines().collect();

    let score = lines
        .iter()
        .find(|line| line.contains("Score:"))
        .map(|line| {
            line.chars()
                .filter(|c| c.is_ascii_digit())
                .collect::<String>()
        })
        .and_then(|digits| digits.parse::<i64>().ok())
        .map(|value| clamp_score(value, 1, 10))
        .unwrap_or(5);

    let is_correct = lines
        .iter()
        .find(|line| line.contains("Correctness:"))
        .map(|line| {
            let lower = line.to_lowercase();
            if lower.contains("incorrect") {
                "incorrect"
            } else if lower.contains("partially") {
                "partial"
            } else if lower.contains("correct") {
                "correct"
            } else {
                "unknown"
            }
        })
        .unwrap_or("unknown")
        .to_string();

    let better_answer = extract_better_answer(&lines);

    AnswerEvaluation {
        score,
        feedback: text.to_string(),
        is_correct,
        better_answer,
        detailed_analysis: parse_feedback_details(&lines),
    }
}

fn extract_better_answer(lines: &[&str]) -> String {
    let start = match lines.iter().position(|line| line.contains("Better Answer:")) {
        Some(idx) => idx,
        None => return String::new(),
    };

    let mut collected = Vec::new();
    for line in &lines[start..] {
        let trimmed = line.trim();
        if trimmed.starts_with("STAR Method:") {
            break;
        }
        if !trimmed.is_empty()
            && !trimmed.starts_with("Score:")
            && !trimmed.starts_with("Correctness:")
        {
            collected.push(trimmed.replace("Better Answer:", "").trim().to_string());
        }
    }

    collected.join("\n").trim().to_string()
}

fn parse_feedback_details(lines: &[&str]) -> FeedbackDetails {
    let mut strengths = Vec::new();
    let mut improvements = Vec::new();
    let mut section: Option<&str> = None;

    for line in lines {
        let trimmed = line.trim();

        if trimmed.contains("Strengths:") {
            section = Some("strengths");
        } else if trimmed.contains("Improvements:") || trimmed.contains("Areas for Improvement") {
            section = Some("improvements");
        } else if let Some(item) = bullet_item(trimmed) {
            match section {
                Some("strengths") => strengths.push(item),
                Some("improvements") => improvements.push(item),
                _ => {}
            }
        }
    }

    strengths.truncate(3);
    improvements.truncate(3);

    FeedbackDetails {
        strengths,
        improvements,
    }
}

fn evaluation_fallback(error_msg: &str) -> AnswerEvaluation {
    AnswerEvaluation {
        score: 5,
        feedback: format!(
            "Error during evaluation: {}\n\nPlease try again or check the model configuration.",
            error_msg
        ),
        is_correct: "error".to_string(),
        better_answer: String::new(),
        detailed_analysis: FeedbackDetails {
            strengths: Vec::new(),
            improvements: vec!["Unable to evaluate - technical error occurred".to_string()],
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_questions_numbered_list() {
        let reply = r#"1. Tell me about a project you led from start to finish.
2. How do you handle disagreements during code review?
3. short
Some commentary the model added."#;

        let questions = parse_questions(reply);
        assert_eq!(questions.len(), 2);
        assert_eq!(
            questions[0],
            "Tell me about a project you led from start to finish."
        );
        assert_eq!(
            questions[1],
            "How do you handle disagreements during code review?"
        );
    }

    #[test]
    fn test_parse_questions_ignores_unnumbered_lines() {
        let questions = parse_questions("Here are your questions:\nNo numbering on this line.");
        assert!(questions.is_empty());
    }

    #[test]
    fn test_fallback_questions_counts_and_membership() {
        let questions = fallback_questions("technical", 5);
        assert_eq!(questions.len(), 5);
        for q in &questions {
            assert!(TECHNICAL_QUESTIONS.contains(&q.as_str()));
        }

        // Unknown types fall back to the behavioral bank
        let questions = fallback_questions("mystery", 3);
        for q in &questions {
            assert!(BEHAVIORAL_QUESTIONS.contains(&q.as_str()));
        }
    }

    #[test]
    fn test_parse_evaluation_full_reply() {
        let reply = r#"Score: 8

Correctness: Partially Correct - missed the indexing detail

Strengths:
- Clear structure
- Good use of examples
- Confident delivery
- Extra strength beyond the cap

Improvements:
- Quantify the results

Better Answer: Mention the index scan cost
and the caching layer.

STAR Method: Partial - no result stated"#;

        let eval = parse_evaluation(reply);
        assert_eq!(eval.score, 8);
        assert_eq!(eval.is_correct, "partial");
        assert_eq!(eval.detailed_analysis.strengths.len(), 3);
        assert_eq!(eval.detailed_analysis.improvements, vec!["Quantify the results"]);
        assert!(eval.better_answer.contains("index scan cost"));
        assert!(eval.better_answer.contains("caching layer"));
        assert!(!eval.better_answer.contains("STAR"));
    }

    #[test]
    fn test_parse_evaluation_defaults_without_labels() {
        let eval = parse_evaluation("The answer was fine I suppose.");
        assert_eq!(eval.score, 5);
        assert_eq!(eval.is_correct, "unknown");
        assert!(eval.better_answer.is_empty());
    }

    #[test]
    fn test_parse_evaluation_clamps_score() {
        // Concatenated digits like "9/10" clamp to the ceiling
        let eval = parse_evaluation("Score: 9/10\nCorrectness: Correct");
        assert_eq!(eval.score, 10);
        assert_eq!(eval.is_correct, "correct");
    }

    #[test]
    fn test_parse_evaluation_incorrect_label() {
        let eval = parse_evaluation("Score: 2\nCorrectness: Incorrect - wrong algorithm");
        assert_eq!(eval.is_correct, "incorrect");
        assert_eq!(eval.score, 2);
    }

    #[test]
    fn test_practice_tips_per_kind() {
        let coach = InterviewCoachAgent::new(None);
        assert!(coach.practice_tips("behavioral")[0].contains("STAR"));
        assert_eq!(coach.practice_tips("technical").len(), 5);
        assert_eq!(coach.practice_tips("anything-else").len(), 5);
    }
}
