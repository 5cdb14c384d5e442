//! Keyword guess of an article's topic from its source name.
//!
//! This is a display hint only. Sources that publish across topics always
//! land in whichever bucket their name happens to match first.

pub const GENERAL: &str = "general";

/// Sentinel used by clients to mean "no category filter".
pub const ALL: &str = "all";

/// Checked in order; the first category with a matching keyword wins.
const KEYWORDS: &[(&str, &[&str])] = &[
    ("sports", &["sport", "espn", "nfl", "nba"]),
    ("technology", &["tech", "wired", "verge"]),
    ("business", &["business", "bloomberg", "financial"]),
    ("health", &["health", "medical"]),
    ("science", &["science"]),
    ("entertainment", &["entertainment", "hollywood"]),
];

pub fn category_from_source(source_name: Option<&str>) -> &'static str {
    let Some(name) = source_name else {
        return GENERAL;
    };
    let name = name.to_lowercase();

    KEYWORDS
        .iter()
        .find(|(_, keywords)| keywords.iter().any(|keyword| name.contains(keyword)))
        .map(|(category, _)| *category)
        .unwrap_or(GENERAL)
}

/// Returns the category to filter or tag by, treating `all` and blank
/// values as no category.
pub fn specific_category(category: Option<&str>) -> Option<&str> {
    category
        .map(str::trim)
        .filter(|c| !c.is_empty() && !c.eq_ignore_ascii_case(ALL))
}
