//! Operator-facing run summary rendering.

use marketbrief_core::{OutcomeLine, RunReport};

/// Print the run summary: every asset, source, and summary entry with its
/// outcome, then the artifact path. Partial degradation is visible here
/// even though the run as a whole succeeded.
pub fn render(report: &RunReport) {
    render_section("assets", &report.asset_lines);
    render_section("news sources", &report.source_lines);
    if !report.summary_lines.is_empty() {
        render_section("summaries", &report.summary_lines);
    }

    let degraded = report.degraded_count();
    if degraded > 0 {
        println!("{degraded} entr{} degraded", if degraded == 1 { "y" } else { "ies" });
    }
    println!("snapshot written to {}", report.snapshot_path.display());
}

fn render_section(title: &str, lines: &[OutcomeLine]) {
    if lines.is_empty() {
        return;
    }

    println!("{title}:");
    for line in lines {
        match &line.failure {
            None => println!("  {:<12} ok    {}", line.id, line.detail),
            Some(failure) => {
                println!("  {:<12} fail  {} - {}", line.id, failure.code(), failure.message)
            }
        }
    }
}
