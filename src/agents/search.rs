// src/agents/search.rs
use anyhow::{Context, Result};
use chrono::{Duration, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::{error, info, warn};

use crate::core::{PageExtractor, SearchClient, ServiceConfig};

const PLACEHOLDER_TEXT: &str = "Job opportunity. Visit link for details.";

/// URL path segments that indicate an individual job posting
const JOB_URL_PATTERNS: [&str; 9] = [
    "/job/", "/jobs/", "/career", "/apply", "/position", "/opening", "/vacancy", "/hiring",
    "/recruit",
];

/// URL path segments to exclude (blogs, news, advice, aggregated lists)
const EXCLUDE_URL_PATTERNS: [&str; 15] = [
    "/blog/",
    "/news/",
    "/article/",
    "/post/",
    "/story/",
    "/updates/",
    "/press/",
    "/media/",
    "/tips/",
    "/guide/",
    "/advice/",
    "/search/",
    "/browse/",
    "/directory/",
    "/list/",
];

/// Title phrases that indicate an aggregated listing rather than one posting
const AGGREGATED_PHRASES: [&str; 16] = [
    "jobs in",
    "job openings in",
    "positions in",
    "vacancies in",
    "jobs available",
    "job listings",
    "careers in",
    "remote jobs",
    "job search",
    "find jobs",
    "jobs at",
    "hiring for",
    "open positions",
    "employment opportunities",
    "fully remote",
    "best companies",
];

/// Content markers of a single, individual job posting
const JOB_CONTENT_INDICATORS: [&str; 16] = [
    "apply now",
    "submit application",
    "job description",
    "requirements:",
    "responsibilities:",
    "qualifications:",
    "salary",
    "compensation",
    "benefits",
    "experience required",
    "apply for this job",
    "send resume",
    "submit cv",
    "job summary",
    "about the role",
    "what you will do",
];

#[derive(Debug, Clone, Deserialize)]
pub struct JobSearchConfig {
    pub job_title: String,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub work_style: Option<String>,
    #[serde(default = "default_num_jobs")]
    pub num_jobs: usize,
}

fn default_num_jobs() -> usize {
    5
}

#[derive(Debug, Clone, Serialize)]
pub struct JobListing {
    pub title: String,
    pub url: String,
    pub text: String,
    pub published_date: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SearchOutcome {
    pub raw_results: Vec<JobListing>,
    pub status: String,
    pub count: usize,
}

/// Build a query targeting actual job postings
pub fn build_query(config: &JobSearchConfig) -> String {
    let mut query_parts = vec![
        config.job_title.clone(),
        "job posting".to_string(),
        "apply".to_string(),
    ];

    if let Some(location) = &config.location {
        let lower = location.to_lowercase();
        if !location.is_empty() && lower != "any" && lower != "remote" {
            query_parts.push(format!("in {}", location));
        }
    }

    if let Some(style) = &config.work_style {
        if !style.is_empty() && style != "Any" {
            query_parts.push(style.clone());
        }
    }

    query_parts.join(" ")
}

/// Decides whether a search hit is an individual job posting rather than
/// a blog/news/advice article or an aggregated list page.
pub struct JobPostingFilter {
    aggregated_title_re: Regex,
}

impl JobPostingFilter {
    pub fn new() -> Result<Self> {
        let aggregated_title_re =
            Regex::new(r"\d+\s+.*?\bjobs?\b").context("Invalid aggregated title pattern")?;

        Ok(Self { aggregated_title_re })
    }

    pub fn is_job_posting(&self, url: &str, title: &str, text: &str) -> bool {
        let url_lower = url.to_lowercase();

        if EXCLUDE_URL_PATTERNS
            .iter()
            .any(|pattern| url_lower.contains(pattern))
        {
            return false;
        }

        let title_lower = title.to_lowercase();

        // Count-based titles (e.g. "63 Software Engineering Jobs") are
        // aggregated pages, never individual postings.
        if self.aggregated_title_re.is_match(&title_lower) {
            return false;
        }

        if AGGREGATED_PHRASES
            .iter()
            .any(|phrase| title_lower.contains(phrase))
        {
            return false;
        }

        let text_lower = text.to_lowercase();

        let indicator_count = JOB_CONTENT_INDICATORS
            .iter()
            .filter(|indicator| text_lower.contains(**indicator) || title_lower.contains(**indicator))
            .count();

        let has_job_url = JOB_URL_PATTERNS
            .iter()
            .any(|pattern| url_lower.contains(pattern));
        let has_strong_content = indicator_count >= 2;

        has_job_url || has_strong_content
    }
}

/// Searches the web for job postings and filters out everything that is
/// not an individual posting.
pub struct SearchAgent {
    client: SearchClient,
    extractor: PageExtractor,
    filter: JobPostingFilter,
}

impl SearchAgent {
    pub fn new(config: &ServiceConfig) -> Result<Self> {
        Ok(Self {
            client: SearchClient::new(config)?,
            extractor: PageExtractor::new()?,
            filter: JobPostingFilter::new()?,
        })
    }

    /// Search that returns only actual job postings. Provider failures
    /// degrade to an empty result set.
    pub async fn search(&self, config: &JobSearchConfig) -> SearchOutcome {
        let query = build_query(config);
        let window_start = Utc::now() - Duration::days(60);

        // Request significantly more to account for filtering
        let search_limit = config.num_jobs * 3;

        let hits = match self
            .client
            .search_with_contents(&query, search_limit, window_start)
            .await
        {
            Ok(hits) => hits,
            Err(e) => {
                error!("Search error: {}", e);
                Vec::new()
            }
        };

        let mut seen_urls: HashSet<String> = HashSet::new();
        let mut results = Vec::new();

        for hit in hits {
            if seen_urls.contains(&hit.url) {
                continue;
            }

            let title = hit.title.clone().unwrap_or_default();
            let mut text = hit.text.clone().unwrap_or_default();

            if text.trim().is_empty() {
                match self.extractor.extract_text(&hit.url).await {
                    Ok(extracted) => text = extracted,
                    Err(e) => warn!("Could not extract page content for {}: {}", hit.url, e),
                }
            }

            if self.filter.is_job_posting(&hit.url, &title, &text) {
                seen_urls.insert(hit.url.clone());
                results.push(JobListing {
                    title,
                    url: hit.url,
                    text: if text.trim().is_empty() {
                        PLACEHOLDER_TEXT.to_string()
                    } else {
                        text
                    },
                    published_date: hit.published_date,
                });

                // Stop once we have enough valid jobs
                if results.len() >= config.num_jobs * 2 {
                    break;
                }
            }
        }

        info!("Search for '{}' accepted {} postings", query, results.len());

        let status = if results.is_empty() {
            "no_results".to_string()
        } else {
            "success".to_string()
        };

        SearchOutcome {
            count: results.len(),
            raw_results: results,
            status,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(title: &str, location: Option<&str>, style: Option<&str>) -> JobSearchConfig {
        JobSearchConfig {
            job_title: title.to_string(),
            location: location.map(|s| s.to_string()),
            work_style: style.map(|s| s.to_string()),
            num_jobs: 5,
        }
    }

    #[test]
    fn test_build_query_basic() {
        let q = build_query(&config("Software Engineer", None, None));
        assert_eq!(q, "Software Engineer job posting apply");
    }

    #[test]
    fn test_build_query_with_location_and_style() {
        let q = build_query(&config("Data Analyst", Some("Berlin"), Some("Hybrid")));
        assert_eq!(q, "Data Analyst job posting apply in Berlin Hybrid");
    }

    #[test]
    fn test_build_query_skips_remote_location_and_any_style() {
        let q = build_query(&config("Designer", Some("Remote"), Some("Any")));
        assert_eq!(q, "Designer job posting apply");
    }

    #[test]
    fn test_filter_rejects_blog_urls() {
        let filter = JobPostingFilter::new().unwrap();
        assert!(!filter.is_job_posting(
            "https://example.com/blog/how-to-interview",
            "Engineer role",
            "apply now responsibilities: salary"
        ));
    }

    #[test]
    fn test_filter_rejects_aggregated_count_titles() {
        let filter = JobPostingFilter::new().unwrap();
        assert!(!filter.is_job_posting(
            "https://example.com/job/123",
            "63 Software Engineering Jobs",
            "apply now salary benefits"
        ));
    }

    #[test]
    fn test_filter_rejects_aggregated_phrases() {
        let filter = JobPostingFilter::new().unwrap();
        assert!(!filter.is_job_posting(
            "https://example.com/job/123",
            "Remote Jobs for Developers",
            "apply now salary"
        ));
    }

    #[test]
    fn test_filter_accepts_job_url() {
        let filter = JobPostingFilter::new().unwrap();
        assert!(filter.is_job_posting(
            "https://example.com/jobs/backend-engineer",
            "Backend Engineer",
            ""
        ));
    }

    #[test]
    fn test_filter_accepts_strong_content_without_job_url() {
        let filter = JobPostingFilter::new().unwrap();
        assert!(filter.is_job_posting(
            "https://example.com/backend-engineer",
            "Backend Engineer",
            "Responsibilities: build services. Apply now via our portal."
        ));
    }

    #[test]
    fn test_filter_rejects_weak_content_without_job_url() {
        let filter = JobPostingFilter::new().unwrap();
        assert!(!filter.is_job_posting(
            "https://example.com/backend-engineer",
            "Backend Engineer",
            "We talk about engineering culture."
        ));
    }
}
