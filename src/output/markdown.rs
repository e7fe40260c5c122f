//! Markdown report generation
//!
//! This module renders harvest and probe results as human-readable markdown:
//! run information, column coverage, the per-year series and the most common
//! topics, licenses and probe outcomes.

use crate::harvester::HarvestOutcome;
use crate::output::aggregate::{column_terms, top_n, yearly_counts_for};
use crate::output::stats::summarize_table;
use crate::output::OutputResult;
use crate::prober::ProbeReport;
use crate::registry::Column;
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Number of rows in "most common" tables
pub const TOP_LIMIT: usize = 20;

/// Writes a markdown document to disk
pub fn write_markdown(markdown: &str, output_path: &Path) -> OutputResult<()> {
    let mut file = File::create(output_path)?;
    file.write_all(markdown.as_bytes())?;
    Ok(())
}

/// Formats a harvest as markdown
///
/// # Arguments
///
/// * `topic` - The harvested topic
/// * `outcome` - The finished harvest
pub fn format_harvest_report(topic: &str, outcome: &HarvestOutcome) -> String {
    let table = &outcome.table;
    let mut md = String::new();

    md.push_str(&format!("# Registry Harvest: {}\n\n", topic));

    md.push_str("## Run Information\n\n");
    md.push_str(&format!("- **Rows**: {}\n", table.len()));
    md.push_str(&format!("- **Pages requested**: {}\n", outcome.pages_requested));
    if let Some(count) = outcome.reported_count {
        md.push_str(&format!("- **Registry count**: {}\n", count));
    }
    md.push_str(&format!("- **Stopped**: {}\n", outcome.stop));
    if outcome.stop.is_truncated() {
        md.push_str("- **Note**: the harvest was cut short; rows above are partial\n");
    }
    md.push('\n');

    if table.is_empty() {
        md.push_str("_No records were harvested._\n");
        return md;
    }

    md.push_str("## Column Coverage\n\n");
    md.push_str("| Column | Filled | Empty | Empty % | Unique |\n");
    md.push_str("|--------|--------|-------|---------|--------|\n");
    for summary in summarize_table(table) {
        md.push_str(&format!(
            "| {} | {} | {} | {:.2}% | {} |\n",
            summary.column,
            summary.filled(),
            summary.empty,
            summary.empty_percentage(),
            summary.unique
        ));
    }
    md.push('\n');

    let yearly = yearly_counts_for(table, Column::AdditionDate);
    if !yearly.is_empty() {
        md.push_str("## Tools Added per Year\n\n");
        md.push_str("| Year | Tools |\n");
        md.push_str("|------|-------|\n");
        for (year, count) in &yearly {
            md.push_str(&format!("| {} | {} |\n", year, count));
        }
        md.push('\n');
    }

    push_ranking(
        &mut md,
        &format!("Top {} Most Common Topics", TOP_LIMIT),
        "Topic",
        &top_n(column_terms(table, Column::Topic), TOP_LIMIT),
    );
    push_ranking(
        &mut md,
        &format!("Top {} Most Common Licenses", TOP_LIMIT),
        "License",
        &top_n(column_terms(table, Column::License), TOP_LIMIT),
    );

    md
}

/// Formats probe results as markdown
pub fn format_probe_report(report: &ProbeReport) -> String {
    let mut md = String::new();

    md.push_str("# Endpoint Probe\n\n");
    md.push_str(&format!("- **URLs probed**: {}\n", report.len()));
    md.push_str(&format!(
        "- **Without response**: {}\n\n",
        report.failure_count()
    ));

    md.push_str("## Outcomes\n\n");
    md.push_str("| Result | URLs |\n");
    md.push_str("|--------|------|\n");
    for (status, count) in report.counts() {
        md.push_str(&format!("| {} | {} |\n", status, count));
    }
    md.push('\n');

    let failures: Vec<_> = report.failures().collect();
    if !failures.is_empty() {
        md.push_str("## Unreachable\n\n");
        for result in failures {
            md.push_str(&format!("- {} ({})\n", result.url, result.status));
        }
        md.push('\n');
    }

    md
}

fn push_ranking(md: &mut String, title: &str, label: &str, ranking: &[(String, usize)]) {
    if ranking.is_empty() {
        return;
    }
    md.push_str(&format!("## {}\n\n", title));
    md.push_str(&format!("| {} | Tools |\n", label));
    md.push_str("|---|---|\n");
    for (value, count) in ranking {
        md.push_str(&format!("| {} | {} |\n", value.replace('|', "\\|"), count));
    }
    md.push('\n');
}
