//! The fixed list of top-level categories exposed by the ODESI browse page.

/// Categories scraped when the caller does not pick any.
pub const CATEGORIES: [&str; 19] = [
    "Agriculture",
    "Business and Financial",
    "Census of Population",
    "Communications and Information",
    "Consumer Surveys",
    "COVID-19",
    "Crime and Justice",
    "Demographics and Population",
    "Education",
    "Elections and Politics",
    "Geography",
    "Government Finances and Economic Indicators",
    "Health",
    "Labour and Employment",
    "Natural Resources and Environment",
    "Public Opinion Polls",
    "Social Surveys",
    "Trade",
    "Travel",
];

/// The default catalog as owned strings.
pub fn default_categories() -> Vec<String> {
    CATEGORIES.iter().map(|c| c.to_string()).collect()
}

/// Whether `name` is one of the built-in categories (exact match).
pub fn is_known_category(name: &str) -> bool {
    CATEGORIES.contains(&name)
}
