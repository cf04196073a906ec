//! Shared data model for reviews
//!
//! Field names match the review service's JSON contract, so these types
//! deserialize straight from responses. Severity and category stay as the raw
//! strings the service sent; [`Severity`] and [`Category`] interpret them for
//! display without ever rejecting an unknown tag.

use chrono::{DateTime, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// A single finding within a review
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Suggestion {
    /// First line of the finding
    pub line_start: u32,
    /// Last line of the finding (expected to be >= `line_start`, not enforced)
    pub line_end: u32,
    /// File the finding refers to
    pub file_path: String,
    /// Human-readable description
    pub message: String,
    /// Category tag, e.g. "security"
    pub category: String,
    /// Severity tag, e.g. "high"
    pub severity: String,
    /// Replacement code proposed by the reviewer
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suggested_fix: Option<String>,
}

impl Suggestion {
    /// Interpret the severity tag
    pub fn severity(&self) -> Severity {
        Severity::from_tag(&self.severity)
    }

    /// Display label for the category, or the raw tag if it is not a known one
    pub fn category_label(&self) -> &str {
        Category::from_tag(&self.category)
            .label()
            .unwrap_or(self.category.as_str())
    }

    /// The line span as shown to the user, e.g. "Lines 5-7"
    ///
    /// Inverted ranges are printed as received.
    pub fn line_range(&self) -> String {
        format!("Lines {}-{}", self.line_start, self.line_end)
    }
}

/// The result of one analysis run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Review {
    /// Opaque identifier, also the routing key
    pub review_id: String,
    /// Findings in the order the service returned them
    pub suggestions: Vec<Suggestion>,
    /// Overall summary
    pub summary: String,
    /// Analysis duration in seconds
    pub execution_time: f64,
    /// Creation timestamp as sent by the service
    pub created_at: String,
}

impl Review {
    /// Whether the analysis found nothing to report
    pub fn is_clean(&self) -> bool {
        self.suggestions.is_empty()
    }

    /// Execution time with two decimals, e.g. "0.50s"
    pub fn execution_time_label(&self) -> String {
        format!("{:.2}s", self.execution_time)
    }
}

/// Summary row for the review list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewListItem {
    pub id: String,
    pub file_path: String,
    pub language: String,
    pub summary: String,
    pub created_at: String,
    pub status: String,
    pub suggestion_count: u32,
}

impl ReviewListItem {
    /// Badge text for the suggestion count
    pub fn suggestion_badge(&self) -> String {
        format!("{} suggestions", self.suggestion_count)
    }

    /// Zero suggestions reads as a success, anything else as a warning
    pub fn suggestion_tone(&self) -> Tone {
        if self.suggestion_count > 0 {
            Tone::Warning
        } else {
            Tone::Success
        }
    }
}

/// Display tone used to color badges
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Success,
    Warning,
    Error,
    Neutral,
}

/// Known severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Low,
    Medium,
    High,
    Critical,
    /// Anything the client does not recognize
    Unknown,
}

impl Severity {
    /// Parse a severity tag, case-insensitively
    pub fn from_tag(tag: &str) -> Self {
        match tag.to_ascii_lowercase().as_str() {
            "low" => Severity::Low,
            "medium" => Severity::Medium,
            "high" => Severity::High,
            "critical" => Severity::Critical,
            _ => Severity::Unknown,
        }
    }

    /// Tone used when rendering this severity
    pub fn tone(&self) -> Tone {
        match self {
            Severity::Low => Tone::Success,
            Severity::Medium => Tone::Warning,
            Severity::High | Severity::Critical => Tone::Error,
            Severity::Unknown => Tone::Neutral,
        }
    }
}

/// Known suggestion categories
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    Lint,
    Security,
    Performance,
    Style,
    Refactor,
    Documentation,
    Test,
    Other,
}

impl Category {
    /// Parse a category tag, case-insensitively
    pub fn from_tag(tag: &str) -> Self {
        match tag.to_ascii_lowercase().as_str() {
            "lint" => Category::Lint,
            "security" => Category::Security,
            "performance" => Category::Performance,
            "style" => Category::Style,
            "refactor" => Category::Refactor,
            "documentation" => Category::Documentation,
            "test" => Category::Test,
            _ => Category::Other,
        }
    }

    /// Display label, `None` for unrecognized categories
    pub fn label(&self) -> Option<&'static str> {
        match self {
            Category::Lint => Some("Lint"),
            Category::Security => Some("Security"),
            Category::Performance => Some("Performance"),
            Category::Style => Some("Style"),
            Category::Refactor => Some("Refactor"),
            Category::Documentation => Some("Docs"),
            Category::Test => Some("Testing"),
            Category::Other => None,
        }
    }
}

/// A language the user can pick instead of relying on auto-detection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Language {
    /// Value sent to the service
    pub value: &'static str,
    /// Display label
    pub label: &'static str,
}

/// Languages offered for explicit selection
pub const LANGUAGES: &[Language] = &[
    Language { value: "python", label: "Python" },
    Language { value: "javascript", label: "JavaScript" },
    Language { value: "typescript", label: "TypeScript" },
    Language { value: "java", label: "Java" },
    Language { value: "c", label: "C" },
    Language { value: "cpp", label: "C++" },
    Language { value: "csharp", label: "C#" },
    Language { value: "go", label: "Go" },
    Language { value: "php", label: "PHP" },
    Language { value: "ruby", label: "Ruby" },
    Language { value: "rust", label: "Rust" },
    Language { value: "swift", label: "Swift" },
    Language { value: "kotlin", label: "Kotlin" },
];

impl Language {
    /// Look up a language by its service value
    pub fn find(value: &str) -> Option<&'static Language> {
        LANGUAGES.iter().find(|l| l.value == value)
    }
}

/// Format a service timestamp as e.g. "Jan 1, 2024, 12:00 AM" (UTC)
///
/// Accepts RFC 3339 and the naive ISO-8601 form the service emits. Anything
/// else is returned unchanged.
pub fn format_timestamp(raw: &str) -> String {
    const DISPLAY: &str = "%b %-d, %Y, %I:%M %p";

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return dt.naive_utc().format(DISPLAY).to_string();
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return dt.format(DISPLAY).to_string();
    }
    raw.to_string()
}
