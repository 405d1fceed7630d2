// src/utils.rs
use std::collections::HashSet;

/// Normalize an interview question kind
pub fn normalize_question_kind(kind: Option<&str>) -> String {
    match kind.map(|s| s.to_lowercase()).as_deref() {
        Some("technical") | Some("tech") => "technical".to_string(),
        Some("situational") | Some("scenario") => "situational".to_string(),
        _ => "behavioral".to_string(), // Default for None or unknown kinds
    }
}

/// Truncate to a maximum number of characters without splitting a code point
pub fn truncate_chars(text: &str, max_chars: usize) -> String {
    text.chars().take(max_chars).collect()
}

/// Strip a leading bullet marker, returning the item text if the line is a bullet
pub fn bullet_item(line: &str) -> Option<String> {
    let trimmed = line.trim();
    if trimmed.starts_with('-') || trimmed.starts_with('•') {
        let item = trimmed.trim_start_matches(['-', '•']).trim();
        if item.is_empty() {
            None
        } else {
            Some(item.to_string())
        }
    } else {
        None
    }
}

/// Strip leading list numbering ("1.", "2)", "3 ") from a line
pub fn strip_numbering(line: &str) -> String {
    line.trim()
        .trim_start_matches(|c: char| c.is_ascii_digit() || c == '.' || c == ')' || c == ' ')
        .trim()
        .to_string()
}

/// Share of uppercase characters in the text
pub fn uppercase_ratio(text: &str) -> f64 {
    if text.is_empty() {
        return 0.0;
    }
    let upper = text.chars().filter(|c| c.is_uppercase()).count();
    upper as f64 / text.chars().count() as f64
}

/// Count how many of the given keywords appear in the (already lowercased) text
pub fn keyword_hits(text_lower: &str, keywords: &[&str]) -> usize {
    keywords.iter().filter(|kw| text_lower.contains(*kw)).count()
}

/// Split a text into its lowercase words, dropping common stopwords
pub fn content_words(text: &str) -> HashSet<String> {
    const STOP_WORDS: [&str; 10] = ["and", "or", "the", "in", "with", "for", "to", "of", "a", "an"];

    text.to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty() && !STOP_WORDS.contains(w))
        .map(|w| w.to_string())
        .collect()
}

/// Clamp an integer score into the inclusive range
pub fn clamp_score(value: i64, min: i64, max: i64) -> i64 {
    value.min(max).max(min)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_question_kind() {
        assert_eq!(normalize_question_kind(Some("technical")), "technical");
        assert_eq!(normalize_question_kind(Some("Situational")), "situational");
        assert_eq!(normalize_question_kind(Some("behavioral")), "behavioral");
        assert_eq!(normalize_question_kind(Some("unknown")), "behavioral");
        assert_eq!(normalize_question_kind(None), "behavioral");
    }

    #[test]
    fn test_truncate_chars() {
        assert_eq!(truncate_chars("hello", 3), "hel");
        assert_eq!(truncate_chars("héllo", 2), "hé");
        assert_eq!(truncate_chars("short", 100), "short");
    }

    #[test]
    fn test_bullet_item() {
        assert_eq!(bullet_item("- Python"), Some("Python".to_string()));
        assert_eq!(
            bullet_item("  • Leadership  "),
            Some("Leadership".to_string())
        );
        assert_eq!(bullet_item("Python"), None);
        assert_eq!(bullet_item("- "), None);
    }

    #[test]
    fn test_strip_numbering() {
        assert_eq!(strip_numbering("1. First question"), "First question");
        assert_eq!(strip_numbering("10) Tenth"), "Tenth");
        assert_eq!(strip_numbering("No numbering"), "No numbering");
    }

    #[test]
    fn test_uppercase_ratio() {
        assert!(uppercase_ratio("abc") < 0.01);
        assert!(uppercase_ratio("ABC") > 0.9);
        assert_eq!(uppercase_ratio(""), 0.0);
    }

    #[test]
    fn test_content_words_drops_stopwords() {
        let words = content_words("Experience with the AWS cloud");
        assert!(words.contains("aws"));
        assert!(words.contains("cloud"));
        assert!(!words.contains("with"));
        assert!(!words.contains("the"));
    }

    #[test]
    fn test_clamp_score() {
        assert_eq!(clamp_score(120, 0, 100), 100);
        assert_eq!(clamp_score(-5, 0, 100), 0);
        assert_eq!(clamp_score(7, 1, 10), 7);
    }
}
