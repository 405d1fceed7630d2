// src/agents/career_planner.rs
use anyhow::{Context, Result};
use regex::Regex;
use serde::Serialize;
use tracing::error;

use super::skill_analyzer::SkillSet;
use crate::core::LlmClient;
use crate::utils::{bullet_item, clamp_score};

const PLANNER_TEMPERATURE: f32 = 0.4;

#[derive(Debug, Clone, Serialize)]
pub struct CareerPath {
    pub current_role: String,
    pub target_role: String,
    pub feasibility_score: i64,
    pub timeline_months: i64,
    pub milestones: Vec<String>,
    pub challenges: Vec<String>,
    pub pathway_description: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct BridgeRole {
    pub role_title: String,
    pub rationale: String,
    pub skills_built: Vec<String>,
    pub timeline_months: i64,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct NetworkingStrategy {
    pub target_contacts: Vec<String>,
    pub events_communities: Vec<String>,
    pub outreach_template: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct LearningPhase {
    pub phase_name: String,
    pub duration: String,
    pub focus: String,
    pub resources: Vec<String>,
    pub projects: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct LearningRoadmap {
    pub skill_gaps: Vec<String>,
    pub learning_phases: Vec<LearningPhase>,
    pub total_duration: String,
}

/// Predicts career trajectories, recommends bridge roles, and builds
/// learning roadmaps for transitions the skills don't support yet.
pub struct CareerPlannerAgent {
    llm: Option<LlmClient>,
    feasibility_re: Regex,
    score_re: Regex,
    feasibility_word_re: Regex,
    months_re: Regex,
    integer_re: Regex,
    duration_re: Regex,
}

impl CareerPlannerAgent {
    pub fn new(llm: Option<LlmClient>) -> Result<Self> {
        Ok(Self {
            llm,
            feasibility_re: Regex::new(r"(?i)FEASIBILITY:\s*(\d+)/10")
                .context("Invalid feasibility pattern")?,
            score_re: Regex::new(r"(?i)(\d+)\s*(?:/|out of)\s*10")
                .context("Invalid score pattern")?,
            feasibility_word_re: Regex::new(r"(?i)feasibility[:\s]+(\d+)")
                .context("Invalid feasibility word pattern")?,
            months_re: Regex::new(r"(?i)(\d+)\s*(?:to\s*)?(\d+)?\s*months?")
                .context("Invalid months pattern")?,
            integer_re: Regex::new(r"\d+").context("Invalid integer pattern")?,
            duration_re: Regex::new(r"(?i)(\d+[-\s]*\d*)\s*months?")
                .context("Invalid duration pattern")?,
        })
    }

    /// Predict the career trajectory from current to target role.
    /// A failing model call falls back to a skill-count-based estimate.
    pub async fn predict_path(
        &self,
        current_role: &str,
        target_role: &str,
        skills: &SkillSet,
    ) -> CareerPath {
        let llm = match &self.llm {
            Some(llm) => llm,
            None => return self.fallback_path(current_role, target_role, skills),
        };

        let system_prompt = r#"You are a career counselor specializing in career transitions.
Analyze the career path from current role to target role and provide a REALISTIC assessment.

CRITICAL: You MUST provide a feasibility score on the FIRST line in this EXACT format:
FEASIBILITY: X/10

Where X is a number from 1-10 based on:
- 1-3: Very difficult (major skill gaps, different field)
- 4-6: Moderate challenge (some transferable skills, achievable with effort)
- 7-9: Feasible (good skill match, logical progression)
- 10: Easy (direct progression, skills already aligned)

Then provide:
1. Estimated timeline (in months)
2. Key milestones needed
3. Potential challenges

BE HONEST - don't inflate scores. Consider the actual difficulty of the transition."#;

        let user_prompt = format!(
            "Current Role: {}\nTarget Role: {}\n\nCurrent Skills:\n{}\n\nAnalyze this career transition realistically. What's the feasibility score?",
            current_role,
            target_role,
            format_skills(skills)
        );

        match llm
            .complete(Some(system_prompt), &user_prompt, PLANNER_TEMPERATURE)
            .await
        {
            Ok(reply) => self.parse_career_path(&reply, current_role, target_role, skills),
            Err(e) => {
                error!("Error predicting career path: {}", e);
                self.fallback_path(current_role, target_role, skills)
            }
        }
    }

    /// Parse a career path analysis out of the model's free text
    pub fn parse_career_path(
        &self,
        text: &str,
        current_role: &str,
        target_role: &str,
        skills: &SkillSet,
    ) -> CareerPath {
        // Try the requested format first, then looser score shapes
        let feasibility = self
            .feasibility_re
            .captures(text)
            .or_else(|| self.score_re.captures(text))
            .or_else(|| self.feasibility_word_re.captures(text))
            .and_then(|caps| caps.get(1))
            .and_then(|m| m.as_str().parse::<i64>().ok())
            .unwrap_or_else(|| fallback_feasibility(skills));

        CareerPath {
            current_role: current_role.to_string(),
            target_role: target_role.to_string(),
            feasibility_score: clamp_score(feasibility, 1, 10),
            timeline_months: self.extract_timeline(text),
            milestones: extract_milestones(text),
            challenges: extract_challenges(text),
            pathway_description: text.to_string(),
        }
    }

    fn extract_timeline(&self, text: &str) -> i64 {
        if !text.to_lowercase().contains("month") {
            return 12;
        }

        self.months_re
            .captures(text)
            .and_then(|caps| {
                caps.get(2)
                    .or_else(|| caps.get(1))
                    .and_then(|m| m.as_str().parse::<i64>().ok())
            })
            .unwrap_or(12)
    }

    fn fallback_path(
        &self,
        current_role: &str,
        target_role: &str,
        skills: &SkillSet,
    ) -> CareerPath {
        CareerPath {
            current_role: current_role.to_string(),
            target_role: target_role.to_string(),
            feasibility_score: fallback_feasibility(skills),
            timeline_months: 12,
            milestones: vec![
                "Gain required skills".to_string(),
                "Build portfolio".to_string(),
                "Network in target industry".to_string(),
                "Apply strategically".to_string(),
            ],
            challenges: vec![
                "Skill acquisition".to_string(),
                "Market competition".to_string(),
                "Experience requirements".to_string(),
            ],
            pathway_description: "Standard career transition path".to_string(),
        }
    }

    /// Recommend intermediate roles that bridge current to target
    pub async fn recommend_bridge_roles(
        &self,
        current_role: &str,
        target_role: &str,
        skills: &SkillSet,
    ) -> Vec<BridgeRole> {
        let fallback = vec![BridgeRole {
            role_title: format!("Senior {}", current_role),
            rationale: "Deepens expertise before transition".to_string(),
            skills_built: vec![
                "Advanced technical skills".to_string(),
                "Leadership".to_string(),
            ],
            timeline_months: 12,
        }];

        let llm = match &self.llm {
            Some(llm) => llm,
            None => return fallback,
        };

        let system_prompt = r#"You are a career strategist. Recommend 3-5 intermediate "bridge" roles
that would help someone transition from their current role to their target role.

For each role, provide:
- Role title
- Why it's a good bridge (1 sentence)
- Key skills it builds
- Typical timeline in this role (months)

Format as:
ROLE: [title]
WHY: [reason]
SKILLS: [skill1, skill2, skill3]
TIMELINE: [months]
---"#;

        let user_prompt = format!(
            "Current Role: {}\nTarget Role: {}\n\nCurrent Skills:\n{}\n\nRecommend bridge roles for this transition.",
            current_role,
            target_role,
            format_skills(skills)
        );

        match llm
            .complete(Some(system_prompt), &user_prompt, PLANNER_TEMPERATURE)
            .await
        {
            Ok(reply) => self.parse_bridge_roles(&reply),
            Err(e) => {
                error!("Error recommending bridge roles: {}", e);
                fallback
            }
        }
    }

    /// Parse bridge role blocks from the labeled response
    pub fn parse_bridge_roles(&self, text: &str) -> Vec<BridgeRole> {
        let mut roles = Vec::new();
        let mut current: Option<BridgeRole> = None;

        for line in text.lines() {
            let line = line.trim();

            if let Some(value) = line.strip_prefix("ROLE:") {
                if let Some(role) = current.take() {
                    roles.push(role);
                }
                current = Some(BridgeRole {
                    role_title: value.trim().to_string(),
                    rationale: String::new(),
                    skills_built: Vec::new(),
                    timeline_months: 12,
                });
            } else if let Some(role) = current.as_mut() {
                if let Some(value) = line.strip_prefix("WHY:") {
                    role.rationale = value.trim().to_string();
                } else if let Some(value) = line.strip_prefix("SKILLS:") {
                    role.skills_built = value
                        .split(',')
                        .map(|s| s.trim().to_string())
                        .filter(|s| !s.is_empty())
                        .collect();
                } else if line.starts_with("TIMELINE:") {
                    role.timeline_months = self
                        .integer_re
                        .find(line)
                        .and_then(|m| m.as_str().parse::<i64>().ok())
                        .unwrap_or(12);
                } else if line == "---" {
                    if let Some(role) = current.take() {
                        roles.push(role);
                    }
                }
            }
        }

        if let Some(role) = current {
            if !role.role_title.is_empty() {
                roles.push(role);
            }
        }

        roles.truncate(5);
        roles
    }

    /// Generate networking recommendations for the target role
    pub async fn networking_strategy(
        &self,
        target_role: &str,
        target_industry: &str,
    ) -> NetworkingStrategy {
        let fallback = NetworkingStrategy {
            target_contacts: vec![
                "Hiring Managers".to_string(),
                "Team Leads".to_string(),
                "Recruiters".to_string(),
            ],
            events_communities: vec![
                "LinkedIn Groups".to_string(),
                "Industry Conferences".to_string(),
            ],
            outreach_template: "Professional networking message template".to_string(),
        };

        let llm = match &self.llm {
            Some(llm) => llm,
            None => return fallback,
        };

        let industry_context = if target_industry.is_empty() {
            String::new()
        } else {
            format!("in the {} industry", target_industry)
        };

        let system_prompt = format!(
            r#"You are a career networking expert. Provide specific, actionable networking advice
for someone targeting a {} role {}.

Provide:
1. Target Contacts (specific role titles to network with)
2. Events/Communities (real organizations, conferences, or online communities)
3. Outreach Template (brief, professional message template)

Be specific and realistic."#,
            target_role, industry_context
        );

        let user_prompt = format!("Generate networking strategy for: {}", target_role);

        match llm
            .complete(Some(&system_prompt), &user_prompt, PLANNER_TEMPERATURE)
            .await
        {
            Ok(reply) => parse_networking_strategy(&reply),
            Err(e) => {
                error!("Error generating networking strategy: {}", e);
                fallback
            }
        }
    }

    /// Generate a detailed learning roadmap when skills don't match the target
    pub async fn skill_roadmap(
        &self,
        current_role: &str,
        target_role: &str,
        current_skills_text: &str,
        feasibility_score: i64,
    ) -> LearningRoadmap {
        let llm = match &self.llm {
            Some(llm) => llm,
            None => return default_roadmap(),
        };

        let system_prompt = r#"You are a career development expert. Create a structured learning roadmap.

You MUST follow this EXACT format:

SKILL GAPS:
- [Skill 1]
- [Skill 2]
- [Skill 3]

PHASE 1: [Phase Name]
DURATION: [X months]
FOCUS: [What to learn]
RESOURCES:
- [Resource 1]
- [Resource 2]
PROJECTS:
- [Project 1]
- [Project 2]

PHASE 2: [Phase Name]
DURATION: [X months]
FOCUS: [What to learn]
RESOURCES:
- [Resource 1]
PROJECTS:
- [Project 1]

TOTAL DURATION: [X-Y months]

Be specific with actual course names, platforms (Coursera, Udemy, YouTube channels), and project ideas."#;

        let skills_text = if current_skills_text.is_empty() {
            "Limited skills provided"
        } else {
            current_skills_text
        };

        let user_prompt = format!(
            "Current Role: {}\nTarget Role: {}\nCurrent Skills: {}\nFeasibility: {}/10\n\nCreate a roadmap to transition to the target role.",
            current_role, target_role, skills_text, feasibility_score
        );

        match llm
            .complete(Some(system_prompt), &user_prompt, PLANNER_TEMPERATURE)
            .await
        {
            Ok(reply) => self.parse_roadmap(&reply),
            Err(e) => {
                error!("Error generating roadmap: {}", e);
                default_roadmap()
            }
        }
    }

    /// Parse a learning roadmap out of the sectioned response
    pub fn parse_roadmap(&self, text: &str) -> LearningRoadmap {
        let mut skill_gaps: Vec<String> = Vec::new();
        let mut phases: Vec<LearningPhase> = Vec::new();
        let mut total_duration = "6-9 months".to_string();

        let mut section: Option<&str> = None;
        let mut current_phase: Option<LearningPhase> = None;

        for line in text.lines() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            let upper = line.to_uppercase();

            if upper.contains("SKILL GAP") {
                section = Some("skill_gaps");
                current_phase = None;
            } else if upper.contains("TOTAL DURATION") {
                if let Some(m) = self.duration_re.find(line) {
                    total_duration = m.as_str().to_string();
                }
                section = None;
            } else if upper.starts_with("PHASE") {
                if let Some(phase) = current_phase.take() {
                    phases.push(phase);
                }
                let phase_name = match line.split_once(':') {
                    Some((_, name)) => name.trim().to_string(),
                    None => line.to_string(),
                };
                current_phase = Some(LearningPhase {
                    phase_name,
                    duration: "3 months".to_string(),
                    focus: String::new(),
                    resources: Vec::new(),
                    projects: Vec::new(),
                });
                section = Some("phase");
            } else if current_phase.is_some() && upper.contains("DURATION:") {
                if let (Some(phase), Some((_, value))) =
                    (current_phase.as_mut(), line.split_once(':'))
                {
                    phase.duration = value.trim().to_string();
                }
            } else if current_phase.is_some() && upper.contains("FOCUS:") {
                if let (Some(phase), Some((_, value))) =
                    (current_phase.as_mut(), line.split_once(':'))
                {
                    phase.focus = value.trim().to_string();
                }
            } else if current_phase.is_some() && upper.contains("RESOURCE") {
                section = Some("resources");
            } else if current_phase.is_some() && upper.contains("PROJECT") {
                section = Some("projects");
            } else if let Some(item) = bullet_item(line) {
                match (section, current_phase.as_mut()) {
                    (Some("skill_gaps"), _) => skill_gaps.push(item),
                    (Some("resources"), Some(phase)) => phase.resources.push(item),
                    (Some("projects"), Some(phase)) => phase.projects.push(item),
                    _ => {}
                }
            }
        }

        if let Some(phase) = current_phase {
            phases.push(phase);
        }

        // Return the default if parsing completely failed
        if skill_gaps.is_empty() && phases.is_empty() {
            return default_roadmap();
        }

        if skill_gaps.is_empty() {
            skill_gaps = vec![
                "Core technical skills".to_string(),
                "Domain knowledge".to_string(),
                "Best practices".to_string(),
            ];
        }

        if phases.is_empty() {
            phases = vec![LearningPhase {
                phase_name: "Learning Phase".to_string(),
                duration: "3-6 months".to_string(),
                focus: "Build required skills for target role".to_string(),
                resources: vec![
                    "Online courses".to_string(),
                    "Documentation".to_string(),
                    "Practice".to_string(),
                ],
                projects: vec!["Build portfolio projects".to_string()],
            }];
        }

        LearningRoadmap {
            skill_gaps,
            learning_phases: phases,
            total_duration,
        }
    }
}

/// Format a skill set into prompt-ready category lines
pub fn format_skills(skills: &SkillSet) -> String {
    let mut result = Vec::new();

    for (label, list) in [
        ("Technical", &skills.technical),
        ("Soft", &skills.soft),
        ("Domain", &skills.domain),
    ] {
        if !list.is_empty() {
            let items = list.iter().take(5).cloned().collect::<Vec<_>>().join(", ");
            result.push(format!("{}: {}", label, items));
        }
    }

    if result.is_empty() {
        "No skills provided".to_string()
    } else {
        result.join("\n")
    }
}

/// Feasibility estimate derived from how many skills were provided
fn fallback_feasibility(skills: &SkillSet) -> i64 {
    match skills.total() {
        0 => 3,
        1..=2 => 4,
        3..=5 => 6,
        _ => 7,
    }
}

fn extract_milestones(text: &str) -> Vec<String> {
    let mut milestones: Vec<String> = Vec::new();
    let mut in_milestones = false;

    for line in text.lines() {
        let trimmed = line.trim();

        if trimmed.to_lowercase().contains("milestone") {
            in_milestones = true;
        } else if in_milestones
            && (trimmed.starts_with('-')
                || trimmed.starts_with('•')
                || trimmed.starts_with(&(milestones.len() + 1).to_string()))
        {
            let milestone = trimmed
                .trim_start_matches(|c: char| {
                    c == '-' || c == '•' || c == '.' || c.is_ascii_digit()
                })
                .trim();
            if milestone.len() > 10 {
                milestones.push(milestone.to_string());
            }
        }
    }

    if milestones.is_empty() {
        milestones = vec![
            "Build foundational skills".to_string(),
            "Gain relevant experience".to_string(),
            "Expand network".to_string(),
            "Apply to target roles".to_string(),
        ];
    }

    milestones.truncate(6);
    milestones
}

fn extract_challenges(text: &str) -> Vec<String> {
    let mut challenges = Vec::new();
    let mut in_challenges = false;

    for line in text.lines() {
        let trimmed = line.trim();
        let lower = trimmed.to_lowercase();

        if lower.contains("challenge") || lower.contains("obstacle") {
            in_challenges = true;
        } else if in_challenges {
            if let Some(item) = bullet_item(trimmed) {
                challenges.push(item);
            }
        }
    }

    if challenges.is_empty() {
        return vec![
            "Skill acquisition".to_string(),
            "Market competition".to_string(),
        ];
    }

    challenges.truncate(5);
    challenges
}

fn parse_networking_strategy(text: &str) -> NetworkingStrategy {
    let mut strategy = NetworkingStrategy::default();
    let mut section: Option<&str> = None;

    for line in text.lines() {
        let line = line.trim();
        let lower = line.to_lowercase();

        if lower.contains("target contact") || lower.contains("who to contact") {
            section = Some("target_contacts");
        } else if lower.contains("event") || lower.contains("communit") {
            section = Some("events_communities");
        } else if lower.contains("template") || lower.contains("message") {
            section = Some("outreach_template");
            strategy.outreach_template.clear();
        } else if let Some(item) = bullet_item(line) {
            match section {
                Some("target_contacts") => strategy.target_contacts.push(item),
                Some("events_communities") => strategy.events_communities.push(item),
                _ => {}
            }
        } else if section == Some("outreach_template") && !line.is_empty() {
            strategy.outreach_template.push_str(line);
            strategy.outreach_template.push('\n');
        }
    }

    strategy
}

fn default_roadmap() -> LearningRoadmap {
    LearningRoadmap {
        skill_gaps: vec![
            "Core technical skills for target role".to_string(),
            "Domain-specific knowledge".to_string(),
            "Industry best practices".to_string(),
            "Relevant tools and technologies".to_string(),
        ],
        learning_phases: vec![
            LearningPhase {
                phase_name: "Phase 1: Foundation Building".to_string(),
                duration: "3 months".to_string(),
                focus: "Master fundamental technical skills".to_string(),
                resources: vec![
                    "Coursera or Udemy beginner courses".to_string(),
                    "Official documentation".to_string(),
                    "YouTube tutorials".to_string(),
                ],
                projects: vec![
                    "Build 2-3 small practice projects".to_string(),
                    "Contribute to open source".to_string(),
                ],
            },
            LearningPhase {
                phase_name: "Phase 2: Intermediate Skills".to_string(),
                duration: "3 months".to_string(),
                focus: "Apply skills in real-world scenarios".to_string(),
                resources: vec![
                    "Advanced online courses".to_string(),
                    "Industry certifications".to_string(),
                    "Professional communities".to_string(),
                ],
                projects: vec![
                    "Create portfolio projects".to_string(),
                    "Build end-to-end applications".to_string(),
                ],
            },
        ],
        total_duration: "6-9 months".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn planner() -> CareerPlannerAgent {
        CareerPlannerAgent::new(None).unwrap()
    }

    fn skills(count: usize) -> SkillSet {
        SkillSet {
            technical: (0..count).map(|i| format!("Skill{}", i)).collect(),
            soft: Vec::new(),
            domain: Vec::new(),
        }
    }

    #[test]
    fn test_parse_career_path_requested_format() {
        let path = planner().parse_career_path(
            "FEASIBILITY: 7/10\nThe transition looks reasonable.",
            "Engineer",
            "Manager",
            &skills(0),
        );
        assert_eq!(path.feasibility_score, 7);
    }

    #[test]
    fn test_parse_career_path_loose_score_formats() {
        let path = planner().parse_career_path(
            "I would rate this 6 out of 10 overall.",
            "Engineer",
            "Manager",
            &skills(0),
        );
        assert_eq!(path.feasibility_score, 6);

        let path = planner().parse_career_path(
            "The feasibility: 8 given your background.",
            "Engineer",
            "Manager",
            &skills(0),
        );
        assert_eq!(path.feasibility_score, 8);
    }

    #[test]
    fn test_parse_career_path_falls_back_to_skill_count() {
        let planner = planner();
        let text = "No recognizable rating in this reply.";

        for (count, expected) in [(0, 3), (2, 4), (5, 6), (8, 7)] {
            let path = planner.parse_career_path(text, "A", "B", &skills(count));
            assert_eq!(path.feasibility_score, expected);
        }
    }

    #[test]
    fn test_parse_career_path_clamps_score() {
        let path = planner().parse_career_path(
            "FEASIBILITY: 15/10 because you are amazing",
            "A",
            "B",
            &skills(0),
        );
        assert_eq!(path.feasibility_score, 10);
    }

    #[test]
    fn test_extract_timeline() {
        let planner = planner();
        assert_eq!(planner.extract_timeline("Expect 6 to 9 months of work"), 9);
        assert_eq!(planner.extract_timeline("About 18 months overall"), 18);
        assert_eq!(planner.extract_timeline("No duration given"), 12);
    }

    #[test]
    fn test_extract_milestones_and_challenges() {
        let text = r#"Key milestones:
- Complete a cloud certification program
- Ship two production projects
Potential challenges:
- Low demand
- Timing"#;

        // Short challenge bullets stay below the milestone length cutoff
        let milestones = extract_milestones(text);
        assert_eq!(milestones.len(), 2);
        assert!(milestones[0].contains("cloud certification"));

        let challenges = extract_challenges(text);
        assert_eq!(challenges, vec!["Low demand", "Timing"]);
    }

    #[test]
    fn test_extract_milestones_defaults() {
        let milestones = extract_milestones("Nothing structured here.");
        assert_eq!(milestones.len(), 4);
        assert_eq!(milestones[0], "Build foundational skills");
    }

    #[test]
    fn test_parse_bridge_roles() {
        let reply = r#"ROLE: Tech Lead
WHY: Builds leadership while staying technical
SKILLS: Mentoring, Architecture, Delivery
TIMELINE: 18 months
---
ROLE: Engineering Manager
WHY: Direct step into management
SKILLS: Hiring, Planning
TIMELINE: 24
---"#;

        let roles = planner().parse_bridge_roles(reply);
        assert_eq!(roles.len(), 2);
        assert_eq!(roles[0].role_title, "Tech Lead");
        assert_eq!(roles[0].skills_built.len(), 3);
        assert_eq!(roles[0].timeline_months, 18);
        assert_eq!(roles[1].timeline_months, 24);
    }

    #[test]
    fn test_parse_bridge_roles_caps_at_five() {
        let mut reply = String::new();
        for i in 0..7 {
            reply.push_str(&format!("ROLE: Role {}\nWHY: reason\nTIMELINE: 12\n---\n", i));
        }
        assert_eq!(planner().parse_bridge_roles(&reply).len(), 5);
    }

    #[test]
    fn test_parse_networking_strategy_sections() {
        let reply = r#"Target Contacts:
- Engineering Directors
- Staff Engineers
Events and Communities:
- RustConf
Outreach Template:
Hi NAME, I noticed your work on TEAM.
Would love to connect."#;

        let strategy = parse_networking_strategy(reply);
        assert_eq!(
            strategy.target_contacts,
            vec!["Engineering Directors", "Staff Engineers"]
        );
        assert_eq!(strategy.events_communities, vec!["RustConf"]);
        assert!(strategy.outreach_template.contains("love to connect"));
    }

    #[test]
    fn test_parse_roadmap_full_structure() {
        let reply = r#"SKILL GAPS:
- Kubernetes
- System design

PHASE 1: Foundations
DURATION: 2 months
FOCUS: Container basics
RESOURCES:
- Kubernetes in Action
PROJECTS:
- Deploy a toy cluster

PHASE 2: Depth
DURATION: 4 months
FOCUS: Production operations
RESOURCES:
- CKA preparation course
PROJECTS:
- Run a highly available service

TOTAL DURATION: 6-8 months"#;

        let roadmap = planner().parse_roadmap(reply);
        assert_eq!(roadmap.skill_gaps, vec!["Kubernetes", "System design"]);
        assert_eq!(roadmap.learning_phases.len(), 2);
        assert_eq!(roadmap.learning_phases[0].phase_name, "Foundations");
        assert_eq!(roadmap.learning_phases[0].duration, "2 months");
        assert_eq!(roadmap.learning_phases[1].resources.len(), 1);
        assert_eq!(roadmap.total_duration, "6-8 months");
    }

    #[test]
    fn test_parse_roadmap_unparseable_reply_returns_default() {
        let roadmap = planner().parse_roadmap("I cannot help with that.");
        assert_eq!(roadmap.learning_phases.len(), 2);
        assert_eq!(roadmap.total_duration, "6-9 months");
        assert!(roadmap.skill_gaps.len() >= 3);
    }

    #[test]
    fn test_parse_roadmap_backfills_missing_phases() {
        let roadmap = planner().parse_roadmap("SKILL GAPS:\n- Terraform\n- Golang");
        assert_eq!(roadmap.skill_gaps, vec!["Terraform", "Golang"]);
        assert_eq!(roadmap.learning_phases.len(), 1);
        assert_eq!(roadmap.learning_phases[0].phase_name, "Learning Phase");
    }

    #[test]
    fn test_format_skills() {
        let set = SkillSet {
            technical: vec!["Python".to_string(), "Rust".to_string()],
            soft: vec!["Teamwork".to_string()],
            domain: Vec::new(),
        };
        assert_eq!(format_skills(&set), "Technical: Python, Rust\nSoft: Teamwork");
        assert_eq!(format_skills(&SkillSet::default()), "No skills provided");
    }
}
