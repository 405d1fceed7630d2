// src/agents/personalization.rs
use anyhow::{Context, Result};
use regex::Regex;
use serde::Serialize;
use tracing::{error, info};

use super::search::JobListing;
use crate::core::LlmClient;
use crate::utils::{clamp_score, truncate_chars, uppercase_ratio};

const AUDIT_TEMPERATURE: f32 = 0.3;

/// Masculine-coded and otherwise loaded wording that lowers the heuristic score
const BIAS_WORDS: [&str; 12] = [
    "ninja",
    "rockstar",
    "guru",
    "dominant",
    "aggressive",
    "young",
    "energetic",
    "competitive",
    "ambitious",
    "assertive",
    "strong",
    "dynamic",
];

const INCLUSIVE_WORDS: [&str; 9] = [
    "diverse",
    "inclusive",
    "equitable",
    "accessible",
    "flexible",
    "collaborative",
    "supportive",
    "balanced",
    "equal opportunity",
];

#[derive(Debug, Clone, Serialize)]
pub struct AuditResult {
    pub score: i64,
    pub flags: Vec<String>,
    pub is_biased: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct ProcessedJob {
    pub title: String,
    pub url: String,
    pub company: String,
    pub location: String,
    pub work_style: String,
    pub salary: Option<String>,
    pub description: String,
    pub audit_score: i64,
    pub audit_flags: Vec<String>,
    pub is_biased: bool,
}

/// Cleans job listings, extracts display fields, and audits them for bias.
pub struct PersonalizationAgent {
    llm: Option<LlmClient>,
    score_re: Regex,
    flags_re: Regex,
    company_re: Regex,
    salary_re: Regex,
}

impl PersonalizationAgent {
    /// Pass `None` to run with heuristic auditing only
    pub fn new(llm: Option<LlmClient>) -> Result<Self> {
        Ok(Self {
            llm,
            score_re: Regex::new(r"SCORE:\s*(\d+)").context("Invalid score pattern")?,
            flags_re: Regex::new(r"FLAGS:\s*(.+)").context("Invalid flags pattern")?,
            company_re: Regex::new(r"(?:at|company|employer):\s*([A-Z][a-zA-Z\s&]{2,30})")
                .context("Invalid company pattern")?,
            salary_re: Regex::new(r"\$\d{1,3}(?:,\d{3})*(?:k|K)?")
                .context("Invalid salary pattern")?,
        })
    }

    /// Audit a job description for bias/inclusivity. Never fails: the model
    /// being unavailable falls back to the heuristic, a failing call falls
    /// back to a neutral passing result.
    pub async fn audit_job(&self, job_text: &str) -> AuditResult {
        let llm = match &self.llm {
            Some(llm) => llm,
            None => return self.heuristic_audit(job_text),
        };

        let prompt = format!(
            r#"Analyze this job description for inclusive language.
Check for:
1. Gender-coded words (e.g., 'ninja', 'dominant', 'nurturing')
2. Ageism
3. Ableism

Return a score from 0-100 (100 = perfectly inclusive) and a list of specific flags.
Format output exactly as:
SCORE: <number>
FLAGS: <flag1>, <flag2> (or 'None')

Job Text (truncated):
{}"#,
            truncate_chars(job_text, 1500)
        );

        match llm.complete(None, &prompt, AUDIT_TEMPERATURE).await {
            Ok(reply) => self.parse_audit_reply(&reply),
            Err(e) => {
                error!("Audit API error: {}", e);
                audit_fallback(&e.to_string())
            }
        }
    }

    fn parse_audit_reply(&self, reply: &str) -> AuditResult {
        let score = self
            .score_re
            .captures(reply)
            .and_then(|caps| caps.get(1))
            .and_then(|m| m.as_str().parse::<i64>().ok())
            .unwrap_or(75);
        let score = clamp_score(score, 0, 100);

        let flags: Vec<String> = self
            .flags_re
            .captures(reply)
            .and_then(|caps| caps.get(1))
            .map(|m| {
                m.as_str()
                    .split(',')
                    .map(|f| f.trim().to_string())
                    .filter(|f| !f.is_empty() && f.to_lowercase() != "none")
                    .collect()
            })
            .unwrap_or_default();

        AuditResult {
            score,
            flags,
            is_biased: score < 70,
        }
    }

    /// Keyword-based audit used when the model is not configured
    pub fn heuristic_audit(&self, job_text: &str) -> AuditResult {
        let mut score: i64 = 75;
        let mut flags = Vec::new();

        let text_lower = job_text.to_lowercase();

        let found_bias: Vec<&str> = BIAS_WORDS
            .iter()
            .filter(|word| text_lower.contains(**word))
            .copied()
            .collect();

        if !found_bias.is_empty() {
            score -= found_bias.len() as i64 * 8;
            flags.push(format!(
                "Potentially biased terms: {}",
                found_bias
                    .iter()
                    .take(3)
                    .copied()
                    .collect::<Vec<_>>()
                    .join(", ")
            ));
        }

        let inclusive_count = INCLUSIVE_WORDS
            .iter()
            .filter(|word| text_lower.contains(**word))
            .count() as i64;

        if inclusive_count > 0 {
            score = (score + inclusive_count * 4).min(100);
        }

        // Very long requirement lists tend to be exclusionary
        if job_text.len() > 2000 {
            score -= 5;
        }

        if uppercase_ratio(job_text) > 0.15 {
            score -= 10;
            flags.push("Excessive capitalization detected".to_string());
        }

        if flags.is_empty() {
            flags.push("Basic audit completed (API unavailable)".to_string());
        }

        let clamped = clamp_score(score, 45, 100);

        AuditResult {
            score: clamped,
            flags,
            is_biased: clamped < 70,
        }
    }

    /// Clean, extract details, and audit bias for a batch of raw listings
    pub async fn process_jobs(&self, raw_jobs: &[JobListing]) -> Vec<ProcessedJob> {
        let mut processed = Vec::with_capacity(raw_jobs.len());

        for job in raw_jobs {
            let text = if job.text.trim().is_empty() {
                format!("Job at {}. See job link for details.", job.title)
            } else {
                job.text.clone()
            };

            let audit = self.audit_job(&text).await;

            processed.push(ProcessedJob {
                title: if job.title.is_empty() {
                    "Job Opening".to_string()
                } else {
                    job.title.clone()
                },
                url: job.url.clone(),
                company: self
                    .extract_company(&text)
                    .unwrap_or_else(|| "Unknown Company".to_string()),
                location: "See details".to_string(),
                work_style: "Flexible".to_string(),
                salary: self.extract_salary(&text),
                description: format!("{}...", truncate_chars(&text, 500)),
                audit_score: audit.score,
                audit_flags: audit.flags,
                is_biased: audit.is_biased,
            });
        }

        info!("Processed {} job listings", processed.len());
        processed
    }

    fn extract_company(&self, text: &str) -> Option<String> {
        self.company_re
            .captures(text)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().trim().to_string())
    }

    fn extract_salary(&self, text: &str) -> Option<String> {
        self.salary_re.find(text).map(|m| m.as_str().to_string())
    }
}

/// Neutral passing result returned when the audit call itself fails
fn audit_fallback(error_msg: &str) -> AuditResult {
    let lower = error_msg.to_lowercase();
    let reason = if lower.contains("quota") {
        "Quota Exceeded".to_string()
    } else if lower.contains("key") {
        "Invalid API Key".to_string()
    } else {
        format!("Error: {}", truncate_chars(error_msg, 100))
    };

    AuditResult {
        score: 70,
        flags: vec![format!("Audit Skipped ({})", reason)],
        is_biased: false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn agent() -> PersonalizationAgent {
        PersonalizationAgent::new(None).unwrap()
    }

    #[test]
    fn test_heuristic_audit_penalizes_bias_words() {
        let clean = agent().heuristic_audit("A welcoming engineering role on our platform team.");
        let biased = agent().heuristic_audit("We need a ninja rockstar guru for our team.");

        assert!(biased.score < clean.score);
        assert!(!biased.flags.is_empty());
        assert!(biased.flags[0].contains("ninja"));
    }

    #[test]
    fn test_heuristic_audit_rewards_inclusive_words() {
        let plain = agent().heuristic_audit("Backend engineer position at our company.");
        let inclusive = agent()
            .heuristic_audit("Inclusive, diverse, and supportive backend engineer position.");

        assert!(inclusive.score > plain.score);
    }

    #[test]
    fn test_heuristic_audit_flags_excessive_caps() {
        let result = agent().heuristic_audit("URGENT!!! APPLY NOW FOR THIS AMAZING JOB!!!");
        assert!(result
            .flags
            .iter()
            .any(|f| f.contains("Excessive capitalization")));
    }

    #[test]
    fn test_heuristic_audit_score_stays_in_range() {
        let worst = agent().heuristic_audit(
            "ninja rockstar guru dominant aggressive young energetic competitive ambitious \
             assertive strong dynamic",
        );
        assert!(worst.score >= 45);
        assert!(worst.is_biased);

        let best = agent().heuristic_audit(
            "diverse inclusive equitable accessible flexible collaborative supportive balanced \
             equal opportunity",
        );
        assert!(best.score <= 100);
        assert!(!best.is_biased);
    }

    #[test]
    fn test_parse_audit_reply_extracts_score_and_flags() {
        let reply = "SCORE: 62\nFLAGS: Gendered wording, Ageist phrasing";
        let result = agent().parse_audit_reply(reply);

        assert_eq!(result.score, 62);
        assert_eq!(result.flags.len(), 2);
        assert!(result.is_biased);
    }

    #[test]
    fn test_parse_audit_reply_defaults_missing_score() {
        let result = agent().parse_audit_reply("The posting looks fine overall.");
        assert_eq!(result.score, 75);
        assert!(result.flags.is_empty());
        assert!(!result.is_biased);
    }

    #[test]
    fn test_parse_audit_reply_filters_none_flag() {
        let result = agent().parse_audit_reply("SCORE: 95\nFLAGS: None");
        assert!(result.flags.is_empty());
    }

    #[test]
    fn test_parse_audit_reply_clamps_out_of_range_score() {
        let result = agent().parse_audit_reply("SCORE: 400\nFLAGS: None");
        assert_eq!(result.score, 100);
    }

    #[test]
    fn test_audit_fallback_classifies_errors() {
        assert!(audit_fallback("quota exhausted for today")
            .flags[0]
            .contains("Quota Exceeded"));
        assert!(audit_fallback("invalid api key supplied")
            .flags[0]
            .contains("Invalid API Key"));

        let generic = audit_fallback("connection reset by peer");
        assert_eq!(generic.score, 70);
        assert!(!generic.is_biased);
        assert!(generic.flags[0].starts_with("Audit Skipped"));
    }

    #[test]
    fn test_extract_company_and_salary() {
        let agent = agent();
        let text = "Hiring at Acme Corp: backend role paying $120,000 per year. company: Acme Corp";
        assert_eq!(agent.extract_company(text), Some("Acme Corp".to_string()));
        assert_eq!(agent.extract_salary(text), Some("$120,000".to_string()));

        assert_eq!(agent.extract_company("no match here"), None);
        assert_eq!(agent.extract_salary("no match here"), None);
    }
}
