use crate::report::report_model::AuditReport;

// ============================================================================
// Console reporter — formatted terminal output
// ============================================================================

/// Format an audit report for terminal output.
///
/// Produces output like:
/// ```text
/// === Follow audit ===
///
/// These accounts do not follow you back:
///
///   @some_user	https://twitter.com/some_user
///   @another	https://twitter.com/another
///
/// === 120 following, 98 followers, 2 not following back in 41.3s ===
/// ```
pub fn format_console_report(report: &AuditReport) -> String {
    let mut out = String::new();

    out.push_str("=== Follow audit ===\n\n");

    if report.all_reciprocal() {
        out.push_str("All accounts you follow, follow you back.\n");
    } else {
        out.push_str("These accounts do not follow you back:\n\n");
        for item in &report.unfollowers {
            match &item.profile_url {
                Some(url) => out.push_str(&format!("  {}\t{}\n", item.handle, url)),
                None => out.push_str(&format!("  {}\n", item.handle)),
            }
        }
    }

    // Summary line
    out.push_str(&format!(
        "\n=== {} following, {} followers, {} not following back",
        report.following_total,
        report.followers_total,
        report.unfollowers.len()
    ));

    if let Some(ms) = report.duration_ms {
        let secs = ms as f64 / 1000.0;
        out.push_str(&format!(" in {:.1}s", secs));
    }

    out.push_str(" ===\n");

    out
}
