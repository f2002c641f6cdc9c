//! Field-level ad-platform constraint checks. Stateless predicates used by
//! both the generation pipeline (entities must be born valid) and the
//! preview editor (re-validation after edits).

use serde::{Deserialize, Serialize};
use url::Url;

/// Maximum ad group name length accepted by the ad platform.
pub const MAX_AD_GROUP_NAME_LEN: usize = 255;
/// Maximum keyword text length.
pub const MAX_KEYWORD_LEN: usize = 80;
/// Headline length bounds, inclusive.
pub const MIN_HEADLINE_LEN: usize = 3;
pub const MAX_HEADLINE_LEN: usize = 30;
/// Description length bounds, inclusive.
pub const MIN_DESCRIPTION_LEN: usize = 10;
pub const MAX_DESCRIPTION_LEN: usize = 90;
/// Structural floors for a responsive search ad.
pub const MIN_HEADLINES_PER_AD: usize = 3;
pub const MIN_DESCRIPTIONS_PER_AD: usize = 2;

const FORBIDDEN_CHARS: [char; 4] = ['<', '>', '{', '}'];

/// Outcome of a single field check. A warning never blocks.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct RuleOutcome {
    pub valid: bool,
    pub error: Option<String>,
    pub warning: Option<String>,
}

impl RuleOutcome {
    fn ok() -> Self {
        Self {
            valid: true,
            error: None,
            warning: None,
        }
    }

    fn error(message: impl Into<String>) -> Self {
        Self {
            valid: false,
            error: Some(message.into()),
            warning: None,
        }
    }

    fn warning(message: impl Into<String>) -> Self {
        Self {
            valid: true,
            error: None,
            warning: Some(message.into()),
        }
    }
}

fn contains_forbidden(text: &str) -> bool {
    text.chars().any(|c| FORBIDDEN_CHARS.contains(&c))
}

/// Ad group name: required, ≤255 chars, no `<`, `>`, `{`, `}`.
pub fn validate_ad_group_name(name: &str) -> RuleOutcome {
    if name.trim().is_empty() {
        return RuleOutcome::error("Ad group name is required");
    }
    if name.chars().count() > MAX_AD_GROUP_NAME_LEN {
        return RuleOutcome::error("Ad group name must be 255 characters or less");
    }
    if contains_forbidden(name) {
        return RuleOutcome::error("Ad group name contains invalid characters (<, >, {, })");
    }
    RuleOutcome::ok()
}

/// Keyword text: required, ≤80 chars, same forbidden set.
pub fn validate_keyword_text(keyword: &str) -> RuleOutcome {
    if keyword.trim().is_empty() {
        return RuleOutcome::error("Keyword is required");
    }
    if keyword.chars().count() > MAX_KEYWORD_LEN {
        return RuleOutcome::error("Keyword must be 80 characters or less");
    }
    if contains_forbidden(keyword) {
        return RuleOutcome::error("Keyword contains invalid characters (<, >, {, })");
    }
    RuleOutcome::ok()
}

/// Headline: required, 3–30 chars inclusive; a non-blocking warning below 10.
pub fn validate_headline(headline: &str) -> RuleOutcome {
    if headline.trim().is_empty() {
        return RuleOutcome::error("Headline is required");
    }
    let len = headline.chars().count();
    if len > MAX_HEADLINE_LEN {
        return RuleOutcome::error("Headline must be 30 characters or less");
    }
    if len < MIN_HEADLINE_LEN {
        return RuleOutcome::error("Headline must be at least 3 characters");
    }
    if len < 10 {
        return RuleOutcome::warning(
            "Headline is very short. Consider making it more descriptive.",
        );
    }
    RuleOutcome::ok()
}

/// Description: required, 10–90 chars inclusive; warning below 30.
pub fn validate_description(description: &str) -> RuleOutcome {
    if description.trim().is_empty() {
        return RuleOutcome::error("Description is required");
    }
    let len = description.chars().count();
    if len > MAX_DESCRIPTION_LEN {
        return RuleOutcome::error("Description must be 90 characters or less");
    }
    if len < MIN_DESCRIPTION_LEN {
        return RuleOutcome::error("Description must be at least 10 characters");
    }
    if len < 30 {
        return RuleOutcome::warning("Description is short. Consider making it more detailed.");
    }
    RuleOutcome::ok()
}

/// Final URL: required, absolute, scheme exactly `http` or `https`.
pub fn validate_final_url(url: &str) -> RuleOutcome {
    if url.trim().is_empty() {
        return RuleOutcome::error("URL is required");
    }
    match Url::parse(url) {
        Ok(parsed) if parsed.scheme() == "http" || parsed.scheme() == "https" => RuleOutcome::ok(),
        Ok(_) => RuleOutcome::error("URL must start with http:// or https://"),
        Err(_) => RuleOutcome::error("Invalid URL format"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ad_group_name_rules() {
        assert!(validate_ad_group_name("Wireless Mouse").valid);
        assert!(!validate_ad_group_name("").valid);
        assert!(!validate_ad_group_name("   ").valid);
        assert!(!validate_ad_group_name("bad {name}").valid);
        assert!(!validate_ad_group_name(&"x".repeat(256)).valid);
        assert!(validate_ad_group_name(&"x".repeat(255)).valid);
    }

    #[test]
    fn test_keyword_rules() {
        assert!(validate_keyword_text("wireless mouse").valid);
        assert!(!validate_keyword_text("").valid);
        assert!(!validate_keyword_text("<script>").valid);
        assert!(!validate_keyword_text(&"k".repeat(81)).valid);
    }

    #[test]
    fn test_headline_too_short_is_error() {
        let outcome = validate_headline("OK");
        assert!(!outcome.valid);
        assert!(outcome
            .error
            .as_deref()
            .unwrap()
            .contains("at least 3 characters"));
    }

    #[test]
    fn test_headline_short_is_warning_only() {
        let outcome = validate_headline("Buy");
        assert!(outcome.valid);
        assert!(outcome.error.is_none());
        assert!(outcome.warning.as_deref().unwrap().contains("very short"));
    }

    #[test]
    fn test_headline_bounds() {
        assert!(!validate_headline(&"h".repeat(31)).valid);
        assert!(validate_headline(&"h".repeat(30)).valid);
        assert!(validate_headline("Premium Wireless Mouse").valid);
        assert!(validate_headline("Premium Wireless Mouse")
            .warning
            .is_none());
    }

    #[test]
    fn test_description_bounds() {
        assert!(!validate_description("too short").valid);
        assert!(!validate_description(&"d".repeat(91)).valid);
        let short = validate_description("Just over the minimum");
        assert!(short.valid);
        assert!(short.warning.is_some());
        let full = validate_description(
            "A detailed description that comfortably exceeds thirty characters.",
        );
        assert!(full.valid);
        assert!(full.warning.is_none());
    }

    #[test]
    fn test_url_rules() {
        assert!(validate_final_url("https://example.com/mouse").valid);
        assert!(validate_final_url("http://example.com").valid);
        assert!(!validate_final_url("ftp://example.com").valid);
        assert!(!validate_final_url("not a url").valid);
        assert!(!validate_final_url("").valid);
    }
}
