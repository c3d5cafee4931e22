//! Markdown summary generation.
//!
//! This module generates the `dashboard.md` page written next to the
//! rendered charts: run metadata, one section per chart with its image and
//! value table, and a failures section when a pipeline aborted.

use crate::models::{DashboardRun, RenderedChart, RunMetadata};
use anyhow::Result;
use std::io::Write;
use std::path::Path;

/// Generate the complete Markdown summary page.
pub fn generate_markdown_summary(run: &DashboardRun) -> String {
    let mut output = String::new();

    // Title
    output.push_str("# Flightboard Dashboard\n\n");

    // Metadata section
    output.push_str(&generate_metadata_section(&run.metadata, run));

    // Failures first, so a broken run is visible at the top
    output.push_str(&generate_failures_section(run));

    // One section per rendered chart, in pipeline launch order
    for pipeline in &run.pipelines {
        for chart in &pipeline.charts {
            output.push_str(&generate_chart_section(chart));
        }
    }

    // Footer
    output.push_str(&generate_footer());

    output
}

/// Generate the metadata section.
fn generate_metadata_section(metadata: &RunMetadata, run: &DashboardRun) -> String {
    let mut section = String::new();

    section.push_str("## Metadata\n\n");
    section.push_str(&format!("- **API:** {}\n", metadata.api_base_url));
    section.push_str(&format!(
        "- **Generated:** {}\n",
        metadata.generated_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));
    section.push_str(&format!(
        "- **Charts Rendered:** {}\n",
        run.charts_rendered()
    ));
    let failed = run.failed_pipelines().len();
    if failed > 0 {
        section.push_str(&format!("- **Pipelines Failed:** {}\n", failed));
    }
    section.push_str(&format!(
        "- **Run Duration:** {:.1}s\n",
        metadata.duration_seconds
    ));
    section.push_str("\n");

    section
}

/// Generate the failures section, empty when every pipeline completed.
fn generate_failures_section(run: &DashboardRun) -> String {
    let failed = run.failed_pipelines();
    if failed.is_empty() {
        return String::new();
    }

    let mut section = String::new();

    section.push_str("## Failures\n\n");
    for pipeline in failed {
        section.push_str(&format!(
            "- **{}**: {}\n",
            pipeline.name,
            pipeline.error.as_deref().unwrap_or("unknown error")
        ));
    }
    section.push_str("\n");

    section
}

/// Generate the section for a single rendered chart.
fn generate_chart_section(chart: &RenderedChart) -> String {
    let mut section = String::new();

    section.push_str(&format!("## {}\n\n", chart.title));

    // The summary sits in the same directory as the chart files
    let file_name = chart
        .path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| chart.path.display().to_string());
    section.push_str(&format!("![{}]({})\n\n", chart.title, file_name));

    if chart.values.is_empty() {
        section.push_str("*No data.*\n\n");
        return section;
    }

    section.push_str("| Label | Value |\n");
    section.push_str("|:---|---:|\n");
    for (label, value) in &chart.values {
        section.push_str(&format!("| {} | {:.2} |\n", label, value));
    }
    section.push_str(&format!("\n*Total: {:.2}*\n\n", chart.total()));

    section
}

/// Generate the page footer.
fn generate_footer() -> String {
    let mut footer = String::new();

    footer.push_str("---\n\n");
    footer.push_str("*Generated by flightboard*\n");

    footer
}

/// Write the summary page to a file.
pub fn write_summary(run: &DashboardRun, path: &Path) -> Result<()> {
    let content = generate_markdown_summary(run);

    let mut file = std::fs::File::create(path)?;
    file.write_all(content.as_bytes())?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PipelineRun;
    use chrono::Utc;
    use std::path::PathBuf;

    fn create_test_run() -> DashboardRun {
        let chart = RenderedChart {
            surface: "income-per-airline".to_string(),
            path: PathBuf::from("out/income-per-airline.png"),
            title: "Income per Airline".to_string(),
            values: vec![
                ("Sky High".to_string(), 1500.0),
                ("Oceanic".to_string(), 750.5),
            ],
            width: 800,
            height: 600,
        };

        DashboardRun {
            metadata: RunMetadata {
                api_base_url: "http://localhost:8000".to_string(),
                generated_at: Utc::now(),
                duration_seconds: 1.4,
            },
            pipelines: vec![
                PipelineRun::completed("income per flight", vec![chart]),
                PipelineRun::failed(
                    "passengers per airline",
                    "Request to http://localhost:8000/passengers-per-airline-today/ timed out after 30s".to_string(),
                ),
            ],
        }
    }

    #[test]
    fn test_generate_markdown_summary() {
        let run = create_test_run();
        let markdown = generate_markdown_summary(&run);

        assert!(markdown.contains("# Flightboard Dashboard"));
        assert!(markdown.contains("## Metadata"));
        assert!(markdown.contains("http://localhost:8000"));
        assert!(markdown.contains("## Income per Airline"));
        assert!(markdown.contains("![Income per Airline](income-per-airline.png)"));
        assert!(markdown.contains("| Sky High | 1500.00 |"));
        assert!(markdown.contains("*Total: 2250.50*"));
    }

    #[test]
    fn test_failures_section_lists_failed_pipelines() {
        let run = create_test_run();
        let markdown = generate_markdown_summary(&run);

        assert!(markdown.contains("## Failures"));
        assert!(markdown.contains("**passengers per airline**"));
        assert!(markdown.contains("timed out after 30s"));
        assert!(markdown.contains("- **Pipelines Failed:** 1\n"));
    }

    #[test]
    fn test_failures_section_absent_on_clean_run() {
        let mut run = create_test_run();
        run.pipelines.retain(|p| p.successful);

        let markdown = generate_markdown_summary(&run);
        assert!(!markdown.contains("## Failures"));
        assert!(!markdown.contains("Pipelines Failed"));
    }

    #[test]
    fn test_chart_section_with_no_values() {
        let chart = RenderedChart {
            surface: "income-per-city".to_string(),
            path: PathBuf::from("out/income-per-city.png"),
            title: "Income per City".to_string(),
            values: Vec::new(),
            width: 800,
            height: 600,
        };

        let section = generate_chart_section(&chart);
        assert!(section.contains("*No data.*"));
        assert!(!section.contains("| Label |"));
    }
}
