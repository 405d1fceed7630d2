// src/agents/skill_analyzer.rs
use serde::{Deserialize, Serialize};
use tracing::{error, info};

use crate::core::LlmClient;
use crate::utils::{bullet_item, content_words, truncate_chars};

const EXTRACT_TEMPERATURE: f32 = 0.3;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SkillSet {
    #[serde(default)]
    pub technical: Vec<String>,
    #[serde(default)]
    pub soft: Vec<String>,
    #[serde(default)]
    pub domain: Vec<String>,
}

impl SkillSet {
    pub fn total(&self) -> usize {
        self.technical.len() + self.soft.len() + self.domain.len()
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct SkillGaps {
    pub critical: Vec<String>,
    pub moderate: Vec<String>,
    pub minor: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct GapAnalysis {
    pub gaps: SkillGaps,
    pub matched: SkillSet,
    pub match_percentage: f64,
    pub resume_skills: SkillSet,
    pub job_skills: SkillSet,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct CourseRecommendation {
    pub skill: String,
    pub course: String,
    pub platform: String,
    pub duration: String,
    pub priority: String,
}

/// Course recommendations bucketed into a 12-month plan
#[derive(Debug, Clone, Default, Serialize)]
pub struct QuarterlyPlan {
    pub months_1_3: Vec<CourseRecommendation>,
    pub months_4_6: Vec<CourseRecommendation>,
    pub months_7_9: Vec<CourseRecommendation>,
    pub months_10_12: Vec<CourseRecommendation>,
}

/// Analyzes resumes and job descriptions to identify skill gaps and
/// recommend learning paths.
pub struct SkillAnalyzerAgent {
    llm: Option<LlmClient>,
}

impl SkillAnalyzerAgent {
    pub fn new(llm: Option<LlmClient>) -> Self {
        Self { llm }
    }

    /// Extract categorized skills from a resume or job description.
    /// Degrades to an empty skill set when the model is unavailable.
    pub async fn extract_skills(&self, text: &str, source_type: &str) -> SkillSet {
        let llm = match &self.llm {
            Some(llm) => llm,
            None => return SkillSet::default(),
        };

        let system_prompt = format!(
            r#"You are an expert at extracting skills from {}s.
Extract and categorize skills into:
- Technical Skills (programming languages, tools, frameworks)
- Soft Skills (communication, leadership, etc.)
- Domain Knowledge (industry-specific knowledge)

Return in this exact format:
TECHNICAL:
- skill1
- skill2

SOFT:
- skill1
- skill2

DOMAIN:
- skill1
- skill2"#,
            source_type
        );

        // Limit input to avoid token limits
        let user_prompt = truncate_chars(text, 3000);

        match llm
            .complete(Some(&system_prompt), &user_prompt, EXTRACT_TEMPERATURE)
            .await
        {
            Ok(reply) => parse_skills(&reply),
            Err(e) => {
                error!("Error extracting skills: {}", e);
                SkillSet::default()
            }
        }
    }

    /// Compare resume skills with job requirements and identify gaps
    pub fn analyze_gaps(&self, resume_skills: &SkillSet, job_skills: &SkillSet) -> GapAnalysis {
        let mut gaps = SkillGaps::default();
        let mut matched = SkillSet::default();

        let categories: [(&str, &Vec<String>, &Vec<String>, &mut Vec<String>); 3] = [
            (
                "technical",
                &resume_skills.technical,
                &job_skills.technical,
                &mut matched.technical,
            ),
            (
                "soft",
                &resume_skills.soft,
                &job_skills.soft,
                &mut matched.soft,
            ),
            (
                "domain",
                &resume_skills.domain,
                &job_skills.domain,
                &mut matched.domain,
            ),
        ];

        for (category, resume_list, job_list, matched_list) in categories {
            for job_skill in job_list {
                let job_lower = job_skill.to_lowercase();

                let is_matched = resume_list.iter().any(|resume_skill| {
                    let resume_lower = resume_skill.to_lowercase();
                    job_lower.contains(&resume_lower)
                        || resume_lower.contains(&job_lower)
                        || skills_similar(&job_lower, &resume_lower)
                });

                if is_matched {
                    matched_list.push(job_skill.clone());
                } else {
                    // Gap severity follows the category
                    match category {
                        "technical" => gaps.critical.push(job_skill.clone()),
                        "domain" => gaps.moderate.push(job_skill.clone()),
                        _ => gaps.minor.push(job_skill.clone()),
                    }
                }
            }
        }

        let total_required = job_skills.total();
        let total_matched = matched.total();

        let match_percentage = if total_required > 0 {
            (total_matched as f64 / total_required as f64 * 1000.0).round() / 10.0
        } else {
            0.0
        };

        GapAnalysis {
            gaps,
            matched,
            match_percentage,
            resume_skills: resume_skills.clone(),
            job_skills: job_skills.clone(),
        }
    }

    /// Recommend learning resources for the given skill gaps
    pub async fn recommend_resources(&self, gaps: &[String]) -> Vec<CourseRecommendation> {
        if gaps.is_empty() {
            return Vec::new();
        }

        let llm = match &self.llm {
            Some(llm) => llm,
            None => return fallback_recommendations(gaps),
        };

        let system_prompt = r#"You are a career development advisor. For each skill gap provided,
recommend specific, real courses or resources. Format as:

SKILL: [skill name]
COURSE: [course name]
PLATFORM: [Coursera/Udemy/LinkedIn Learning/YouTube]
DURATION: [estimated time]
PRIORITY: [High/Medium/Low]
---

Recommend real, popular courses that actually exist."#;

        let gap_list = gaps
            .iter()
            .take(10)
            .map(|gap| format!("- {}", gap))
            .collect::<Vec<_>>()
            .join("\n");
        let user_prompt = format!("Recommend learning resources for these skills:\n{}", gap_list);

        match llm
            .complete(Some(system_prompt), &user_prompt, EXTRACT_TEMPERATURE)
            .await
        {
            Ok(reply) => {
                let parsed = parse_recommendations(&reply);
                info!("Parsed {} course recommendations", parsed.len());
                parsed
            }
            Err(e) => {
                error!("Error getting recommendations: {}", e);
                fallback_recommendations(gaps)
            }
        }
    }

    /// Organize recommendations into a 12-month learning roadmap by priority
    pub fn quarterly_roadmap(&self, recommendations: &[CourseRecommendation]) -> QuarterlyPlan {
        let high: Vec<_> = recommendations
            .iter()
            .filter(|r| r.priority == "High")
            .cloned()
            .collect();
        let medium: Vec<_> = recommendations
            .iter()
            .filter(|r| r.priority == "Medium")
            .cloned()
            .collect();
        let low: Vec<_> = recommendations
            .iter()
            .filter(|r| r.priority == "Low")
            .cloned()
            .collect();

        let months_1_3 = high.iter().take(2).cloned().collect();

        let months_4_6 = if high.len() > 2 {
            high[2..]
                .iter()
                .chain(medium.iter().take(2))
                .cloned()
                .collect()
        } else {
            medium.iter().take(3).cloned().collect()
        };

        let months_7_9 = if medium.len() > 2 {
            medium[2..]
                .iter()
                .chain(low.iter().take(2))
                .cloned()
                .collect()
        } else {
            low.iter().take(3).cloned().collect()
        };

        let months_10_12 = if low.len() > 2 {
            low[2..].to_vec()
        } else {
            Vec::new()
        };

        QuarterlyPlan {
            months_1_3,
            months_4_6,
            months_7_9,
            months_10_12,
        }
    }
}

/// Parse skills from the TECHNICAL/SOFT/DOMAIN formatted response
pub fn parse_skills(text: &str) -> SkillSet {
    let mut skills = SkillSet::default();
    let mut current: Option<&str> = None;

    for line in text.lines() {
        let trimmed = line.trim();
        let upper = trimmed.to_uppercase();

        if upper.contains("TECHNICAL:") {
            current = Some("technical");
        } else if upper.contains("SOFT:") {
            current = Some("soft");
        } else if upper.contains("DOMAIN:") {
            current = Some("domain");
        } else if trimmed.starts_with('-') {
            if let (Some(category), Some(skill)) = (current, bullet_item(trimmed)) {
                if skill.len() > 2 {
                    match category {
                        "technical" => skills.technical.push(skill),
                        "soft" => skills.soft.push(skill),
                        _ => skills.domain.push(skill),
                    }
                }
            }
        }
    }

    skills
}

/// Two skills count as similar when they share at least half of their words
fn skills_similar(skill1: &str, skill2: &str) -> bool {
    let words1 = content_words(skill1);
    let words2 = content_words(skill2);

    if words1.is_empty() || words2.is_empty() {
        return false;
    }

    let shared = words1.intersection(&words2).count();
    shared as f64 / words1.len().max(words2.len()) as f64 >= 0.5
}

/// Parse course recommendations from the labeled-block response
pub fn parse_recommendations(text: &str) -> Vec<CourseRecommendation> {
    let mut recommendations = Vec::new();
    let mut current: Option<CourseRecommendation> = None;

    for line in text.lines() {
        let line = line.trim();

        if let Some(value) = line.strip_prefix("SKILL:") {
            if let Some(rec) = current.take() {
                recommendations.push(rec);
            }
            current = Some(CourseRecommendation {
                skill: value.trim().to_string(),
                ..Default::default()
            });
        } else if let Some(rec) = current.as_mut() {
            if let Some(value) = line.strip_prefix("COURSE:") {
                rec.course = value.trim().to_string();
            } else if let Some(value) = line.strip_prefix("PLATFORM:") {
                rec.platform = value.trim().to_string();
            } else if let Some(value) = line.strip_prefix("DURATION:") {
                rec.duration = value.trim().to_string();
            } else if let Some(value) = line.strip_prefix("PRIORITY:") {
                rec.priority = value.trim().to_string();
            } else if line == "---" {
                if let Some(rec) = current.take() {
                    recommendations.push(rec);
                }
            }
        }
    }

    if let Some(rec) = current {
        if !rec.skill.is_empty() {
            recommendations.push(rec);
        }
    }

    recommendations
}

/// Generic recommendations used when the model call fails
fn fallback_recommendations(gaps: &[String]) -> Vec<CourseRecommendation> {
    gaps.iter()
        .take(5)
        .enumerate()
        .map(|(i, gap)| CourseRecommendation {
            skill: gap.clone(),
            course: format!("Introduction to {}", gap),
            platform: "Coursera".to_string(),
            duration: "4-6 weeks".to_string(),
            priority: if i < 3 { "High" } else { "Medium" }.to_string(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn skill_set(technical: &[&str], soft: &[&str], domain: &[&str]) -> SkillSet {
        SkillSet {
            technical: technical.iter().map(|s| s.to_string()).collect(),
            soft: soft.iter().map(|s| s.to_string()).collect(),
            domain: domain.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[test]
    fn test_parse_skills_sections() {
        let reply = r#"TECHNICAL:
- Python
- React

SOFT:
- Communication

DOMAIN:
- Healthcare systems"#;

        let skills = parse_skills(reply);
        assert_eq!(skills.technical, vec!["Python", "React"]);
        assert_eq!(skills.soft, vec!["Communication"]);
        assert_eq!(skills.domain, vec!["Healthcare systems"]);
    }

    #[test]
    fn test_parse_skills_ignores_short_and_unsectioned_bullets() {
        let reply = "- Orphan skill\nTECHNICAL:\n- Git\n- R\n";
        let skills = parse_skills(reply);
        // "R" is too short, the orphan bullet has no section yet
        assert_eq!(skills.technical, vec!["Git"]);
        assert!(skills.soft.is_empty());
    }

    #[test]
    fn test_parse_skills_empty_reply() {
        let skills = parse_skills("I could not find any skills.");
        assert_eq!(skills.total(), 0);
    }

    #[test]
    fn test_skills_similar() {
        assert!(skills_similar("machine learning", "machine learning models"));
        assert!(!skills_similar("python", "project management"));
        assert!(!skills_similar("", "python"));
    }

    #[test]
    fn test_analyze_gaps_severity_by_category() {
        let agent = SkillAnalyzerAgent::new(None);
        let resume = skill_set(&["Python"], &["Teamwork"], &[]);
        let job = skill_set(&["Python", "Kubernetes"], &["Leadership"], &["Fintech"]);

        let analysis = agent.analyze_gaps(&resume, &job);

        assert_eq!(analysis.gaps.critical, vec!["Kubernetes"]);
        assert_eq!(analysis.gaps.moderate, vec!["Fintech"]);
        assert_eq!(analysis.gaps.minor, vec!["Leadership"]);
        assert_eq!(analysis.matched.technical, vec!["Python"]);
        assert_eq!(analysis.match_percentage, 25.0);
    }

    #[test]
    fn test_analyze_gaps_substring_matching() {
        let agent = SkillAnalyzerAgent::new(None);
        let resume = skill_set(&["AWS Cloud"], &[], &[]);
        let job = skill_set(&["AWS"], &[], &[]);

        let analysis = agent.analyze_gaps(&resume, &job);
        assert!(analysis.gaps.critical.is_empty());
        assert_eq!(analysis.match_percentage, 100.0);
    }

    #[test]
    fn test_analyze_gaps_empty_requirements() {
        let agent = SkillAnalyzerAgent::new(None);
        let analysis = agent.analyze_gaps(&SkillSet::default(), &SkillSet::default());
        assert_eq!(analysis.match_percentage, 0.0);
    }

    #[test]
    fn test_parse_recommendations_blocks() {
        let reply = r#"SKILL: Kubernetes
COURSE: Kubernetes for Developers
PLATFORM: Udemy
DURATION: 6 weeks
PRIORITY: High
---
SKILL: Terraform
COURSE: Terraform Basics
PLATFORM: Coursera
DURATION: 4 weeks
PRIORITY: Medium
---"#;

        let recs = parse_recommendations(reply);
        assert_eq!(recs.len(), 2);
        assert_eq!(recs[0].skill, "Kubernetes");
        assert_eq!(recs[0].platform, "Udemy");
        assert_eq!(recs[1].priority, "Medium");
    }

    #[test]
    fn test_parse_recommendations_without_trailing_separator() {
        let reply = "SKILL: Rust\nCOURSE: The Rust Book\nPLATFORM: YouTube\nDURATION: 8 weeks\nPRIORITY: High";
        let recs = parse_recommendations(reply);
        assert_eq!(recs.len(), 1);
        assert_eq!(recs[0].course, "The Rust Book");
    }

    #[test]
    fn test_fallback_recommendations_shape() {
        let gaps: Vec<String> = ["A", "B", "C", "D", "E", "F"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        let recs = fallback_recommendations(&gaps);

        assert_eq!(recs.len(), 5);
        assert_eq!(recs[0].course, "Introduction to A");
        assert_eq!(recs[0].priority, "High");
        assert_eq!(recs[2].priority, "High");
        assert_eq!(recs[3].priority, "Medium");
    }

    #[test]
    fn test_quarterly_roadmap_buckets_by_priority() {
        let agent = SkillAnalyzerAgent::new(None);
        let mut recs = Vec::new();
        for (skill, priority) in [
            ("A", "High"),
            ("B", "High"),
            ("C", "High"),
            ("D", "Medium"),
            ("E", "Low"),
        ] {
            recs.push(CourseRecommendation {
                skill: skill.to_string(),
                priority: priority.to_string(),
                ..Default::default()
            });
        }

        let plan = agent.quarterly_roadmap(&recs);
        assert_eq!(plan.months_1_3.len(), 2);
        // Third high-priority item overflows into the second quarter
        assert_eq!(plan.months_4_6[0].skill, "C");
        assert!(plan.months_4_6.iter().any(|r| r.skill == "D"));
        assert_eq!(plan.months_7_9.len(), 1);
        assert!(plan.months_10_12.is_empty());
    }
}
