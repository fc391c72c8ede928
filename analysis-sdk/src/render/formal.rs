use super::{or_placeholder, yes_no, Report, SUMMARY};
use crate::schema::FormalResponse;

/// Sections: summary, preconditions, postconditions, ACSL text, warnings, errors, metadata
pub fn render_formal(response: &FormalResponse) -> Report {
    let mut report = Report::new("FORMAL VERIFICATION RESULTS");

    report.push(
        SUMMARY,
        vec![
            format!("Function: {}", or_placeholder(&response.function_name, "(unnamed)")),
            format!("Valid: {}", yes_no(response.is_valid())),
        ],
    );

    report.push(
        "PRECONDITIONS (requires)",
        clause_lines(&response.contracts.preconditions),
    );
    report.push(
        "POSTCONDITIONS (ensures)",
        clause_lines(&response.contracts.postconditions),
    );

    if !response.acsl_code.trim().is_empty() {
        report.push(
            "COMPLETE ACSL SPECIFICATION",
            vec![response.acsl_code.trim_end().to_string()],
        );
    }

    if let Some(validation) = &response.validation {
        report.push(
            "WARNINGS",
            validation.warnings.iter().map(|w| format!("  ⚠ {}", w)).collect(),
        );
        report.push(
            "ERRORS",
            validation.errors.iter().map(|e| format!("  ✗ {}", e)).collect(),
        );
    }

    if let Some(metadata) = &response.metadata {
        let mut lines = vec![
            format!("Template Used: {}", yes_no(metadata.template_used)),
            format!("AI Enhanced: {}", yes_no(metadata.ai_enhanced)),
        ];
        if !metadata.category.trim().is_empty() {
            lines.push(format!("Category: {}", metadata.category));
        }
        report.push("METADATA", lines);
    }

    report
}

fn clause_lines(clauses: &[String]) -> Vec<String> {
    clauses.iter().map(|c| format!("  @ {}", c)).collect()
}
