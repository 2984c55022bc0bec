// Loganizer - core/report.rs
//
// Console rendering of a completed batch: one block per result followed by
// OK / FAILED totals. Writes to any `Write` so the CLI can target stdout
// and tests can target a buffer.

use crate::core::model::{AnalysisResult, BatchSummary};
use std::io::{self, Write};

/// Render every result plus a summary block. Returns the computed summary.
pub fn render_results<W: Write>(results: &[AnalysisResult], mut out: W) -> io::Result<BatchSummary> {
    let summary = BatchSummary::from_results(results);

    writeln!(out)?;
    writeln!(out, "=== ANALYSIS SUMMARY ===")?;
    writeln!(out, "Total files analysed: {}", summary.total)?;
    writeln!(out)?;

    for result in results {
        writeln!(out, "[{}] {}", result.log_id, result.file_path)?;
        writeln!(out, "   Status: {}", result.status)?;
        writeln!(out, "   Message: {}", result.message)?;
        if !result.error_details.is_empty() {
            writeln!(out, "   Error: {}", result.error_details)?;
        }
        writeln!(out)?;
    }

    writeln!(out, "=== TOTALS ===")?;
    writeln!(out, "OK: {} | FAILED: {}", summary.ok, summary.failed)?;
    out.flush()?;

    Ok(summary)
}
