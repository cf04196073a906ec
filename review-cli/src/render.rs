//! Terminal rendering of reviews and review lists

use std::fmt::Write;

use clap::ValueEnum;
use review_core::{format_timestamp, Review, ReviewListItem, Tone, LANGUAGES};

/// Empty-state text for the review list
pub const NO_REVIEWS: &str = "No reviews yet";

/// Shown in place of suggestions for a clean review
pub const NO_ISSUES: &str = "No issues found in the code!";

/// Output format for rendered data
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Markdown,
    Json,
}

fn marker(tone: Tone) -> &'static str {
    match tone {
        Tone::Success => "[ok]",
        Tone::Warning => "[warn]",
        Tone::Error => "[error]",
        Tone::Neutral => "[info]",
    }
}

/// Render the review list
pub fn review_list(items: &[ReviewListItem], format: OutputFormat) -> anyhow::Result<String> {
    if format == OutputFormat::Json {
        return Ok(serde_json::to_string_pretty(items)?);
    }

    let mut out = String::new();
    if items.is_empty() {
        writeln!(out, "{}", NO_REVIEWS)?;
        writeln!(out, "Submit code with `ai-review submit <file>` to create one.")?;
        return Ok(out);
    }

    match format {
        OutputFormat::Markdown => {
            writeln!(out, "| ID | File | Language | Created | Suggestions |")?;
            writeln!(out, "|----|------|----------|---------|-------------|")?;
            for item in items {
                writeln!(
                    out,
                    "| {} | {} | {} | {} | {} |",
                    item.id,
                    item.file_path,
                    item.language,
                    format_timestamp(&item.created_at),
                    item.suggestion_badge()
                )?;
            }
        }
        _ => {
            for item in items {
                writeln!(
                    out,
                    "{} {}  {}",
                    marker(item.suggestion_tone()),
                    item.file_path,
                    item.suggestion_badge()
                )?;
                writeln!(out, "    id: {}", item.id)?;
                writeln!(
                    out,
                    "    {} | {}",
                    item.language,
                    format_timestamp(&item.created_at)
                )?;
                if !item.summary.is_empty() {
                    writeln!(out, "    {}", item.summary)?;
                }
            }
        }
    }

    Ok(out)
}

/// Render a single review with its suggestions
pub fn review(review: &Review, format: OutputFormat) -> anyhow::Result<String> {
    if format == OutputFormat::Json {
        return Ok(serde_json::to_string_pretty(review)?);
    }

    let mut out = String::new();
    match format {
        OutputFormat::Markdown => {
            writeln!(out, "# Review {}", review.review_id)?;
            writeln!(out)?;
            writeln!(
                out,
                "_Created {} | took {}_",
                format_timestamp(&review.created_at),
                review.execution_time_label()
            )?;
            writeln!(out)?;
            writeln!(out, "## Summary")?;
            writeln!(out)?;
            writeln!(out, "{}", review.summary)?;
            writeln!(out)?;
            writeln!(out, "## Suggestions ({})", review.suggestions.len())?;
            writeln!(out)?;
            if review.is_clean() {
                writeln!(out, "{}", NO_ISSUES)?;
            }
            for suggestion in &review.suggestions {
                writeln!(
                    out,
                    "### {} | {} | {}",
                    suggestion.line_range(),
                    suggestion.category_label(),
                    suggestion.severity.to_uppercase()
                )?;
                writeln!(out)?;
                writeln!(out, "{}", suggestion.message)?;
                if let Some(fix) = &suggestion.suggested_fix {
                    writeln!(out)?;
                    writeln!(out, "```")?;
                    writeln!(out, "{}", fix)?;
                    writeln!(out, "```")?;
                }
                writeln!(out)?;
            }
        }
        _ => {
            writeln!(out, "Review {}", review.review_id)?;
            writeln!(
                out,
                "Created: {}    Execution time: {}",
                format_timestamp(&review.created_at),
                review.execution_time_label()
            )?;
            writeln!(out)?;
            writeln!(out, "Summary:")?;
            writeln!(out, "  {}", review.summary)?;
            writeln!(out)?;
            writeln!(out, "Suggestions ({}):", review.suggestions.len())?;
            if review.is_clean() {
                writeln!(out, "  {} {}", marker(Tone::Success), NO_ISSUES)?;
            }
            for suggestion in &review.suggestions {
                writeln!(
                    out,
                    "  {} {} [{}] {}",
                    marker(suggestion.severity().tone()),
                    suggestion.line_range(),
                    suggestion.category_label(),
                    suggestion.severity.to_uppercase()
                )?;
                writeln!(out, "      {}", suggestion.message)?;
                if let Some(fix) = &suggestion.suggested_fix {
                    writeln!(out, "      Suggested fix:")?;
                    for line in fix.lines() {
                        writeln!(out, "        {}", line)?;
                    }
                }
            }
        }
    }

    Ok(out)
}

/// Render the supported language choices
pub fn languages(format: OutputFormat) -> anyhow::Result<String> {
    let mut out = String::new();
    match format {
        OutputFormat::Json => {
            let values: Vec<serde_json::Value> = LANGUAGES
                .iter()
                .map(|l| serde_json::json!({ "value": l.value, "label": l.label }))
                .collect();
            out = serde_json::to_string_pretty(&values)?;
        }
        OutputFormat::Markdown => {
            writeln!(out, "| Value | Label |")?;
            writeln!(out, "|-------|-------|")?;
            for language in LANGUAGES {
                writeln!(out, "| `{}` | {} |", language.value, language.label)?;
            }
        }
        OutputFormat::Text => {
            for language in LANGUAGES {
                writeln!(out, "{:<12} {}", language.value, language.label)?;
            }
            writeln!(out)?;
            writeln!(out, "Omit --language to let the service auto-detect.")?;
        }
    }
    Ok(out)
}
