use super::{or_placeholder, percent_one_decimal, percent_whole, yes_no, Report, SUMMARY};
use crate::schema::{DebugResponse, Priority, Recommendation};

const PRIORITY_GROUPS: [(Priority, &str); 4] = [
    (Priority::High, "HIGH PRIORITY:"),
    (Priority::Medium, "MEDIUM PRIORITY:"),
    (Priority::Low, "LOW PRIORITY:"),
    (Priority::Other, "OTHER PRIORITY:"),
];

/// Sections: summary, compilation, static metrics, AI analysis, recommendations
pub fn render_debug(response: &DebugResponse) -> Report {
    let mut report = Report::new("DEBUGGING RESULTS");
    let compilation = &response.compilation_analysis;

    report.push(
        SUMMARY,
        vec![
            format!("Status: {}", or_placeholder(&response.status, "unknown")),
            format!(
                "Compilation: {}",
                if compilation.compilation_successful {
                    "succeeded"
                } else {
                    "failed"
                }
            ),
        ],
    );

    let mut lines = vec![format!("Success: {}", yes_no(compilation.compilation_successful))];
    if !compilation.errors.trim().is_empty() {
        lines.push(String::new());
        lines.push("Errors:".to_string());
        lines.push(compilation.errors.trim_end().to_string());
    }
    report.push("COMPILATION ANALYSIS", lines);

    let stats = &response.static_analysis;
    let metrics = &stats.code_metrics;
    let mut lines = vec![
        format!("Lines of Code: {}", stats.line_count),
        format!("Functions: {}", stats.function_count),
        format!("Cyclomatic Complexity: {}", metrics.cyclomatic_complexity),
        format!("Comment Ratio: {}", percent_one_decimal(metrics.comment_ratio)),
        format!("Avg Function Length: {:.1} lines", metrics.avg_function_length),
    ];
    if !stats.potential_issues.is_empty() {
        lines.push(String::new());
        lines.push("Potential Issues:".to_string());
        lines.extend(stats.potential_issues.iter().map(|i| format!("  • {}", i)));
    }
    report.push("STATIC ANALYSIS", lines);

    let ai = &response.ai_analysis;
    if !ai.root_cause.trim().is_empty() {
        let mut lines = vec![
            format!("Confidence: {}", percent_whole(ai.confidence)),
            String::new(),
            "Root Cause:".to_string(),
            ai.root_cause.trim_end().to_string(),
        ];
        if !ai.fix_suggestions.is_empty() {
            lines.push(String::new());
            lines.push("Fix Suggestions:".to_string());
            lines.extend(
                ai.fix_suggestions
                    .iter()
                    .enumerate()
                    .map(|(i, s)| format!("  {}. {}", i + 1, s)),
            );
        }
        if !ai.prevention.is_empty() {
            lines.push(String::new());
            lines.push("Prevention Tips:".to_string());
            lines.extend(ai.prevention.iter().map(|t| format!("  • {}", t)));
        }
        report.push("AI ANALYSIS", lines);
    }

    report.push("RECOMMENDATIONS", recommendation_lines(&response.recommendations));

    report
}

/// Group by priority (high, medium, low, then anything else), keeping the
/// original order inside each group. Empty groups are skipped.
fn recommendation_lines(recommendations: &[Recommendation]) -> Vec<String> {
    let mut lines = Vec::new();

    for (priority, label) in PRIORITY_GROUPS {
        let group: Vec<&Recommendation> = recommendations
            .iter()
            .filter(|r| r.priority_level() == priority)
            .collect();

        if group.is_empty() {
            continue;
        }
        if !lines.is_empty() {
            lines.push(String::new());
        }

        lines.push(label.to_string());
        lines.extend(group.iter().map(|r| {
            format!(
                "  [{}] {}",
                or_placeholder(&r.category, "general"),
                r.description
            )
        }));
    }

    lines
}
