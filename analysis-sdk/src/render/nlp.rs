use super::{or_placeholder, Report, SUMMARY};
use crate::schema::{FunctionDetail, NlpResponse, TestGroup};

/// Sections: summary, discovered functions, test case counts, generated test code
pub fn render_nlp(response: &NlpResponse) -> Report {
    let mut report = Report::new("CODE ANALYSIS & TEST GENERATION");

    report.push(
        SUMMARY,
        vec![
            format!("Status: {}", or_placeholder(&response.status, "unknown")),
            format!("Functions Found: {}", response.functions_found),
            format!("Total Tests Generated: {}", response.total_tests),
        ],
    );

    let mut lines = Vec::new();
    for function in &response.functions_details {
        if !lines.is_empty() {
            lines.push(String::new());
        }
        lines.extend(function_lines(function));
    }
    report.push("DISCOVERED FUNCTIONS", lines);

    let mut lines = Vec::new();
    for (name, group) in response.test_cases.iter() {
        if !lines.is_empty() {
            lines.push(String::new());
        }
        lines.push(format!("Tests for: {}", name));
        lines.extend(group_lines(group));
    }
    report.push("TEST CASES SUMMARY", lines);

    if !response.unit_test_code.trim().is_empty() {
        report.push(
            "GENERATED UNIT TEST CODE",
            vec![response.unit_test_code.trim_end().to_string()],
        );
    }

    report
}

fn function_lines(function: &FunctionDetail) -> Vec<String> {
    let mut lines = vec![
        format!("Function: {}", or_placeholder(&function.name, "(unnamed)")),
        format!("Line: {}", function.line_number),
        format!("Signature: {}", function.signature),
        format!("Returns: {}", or_placeholder(&function.return_type, "void")),
    ];

    if !function.parameters.is_empty() {
        lines.push("Parameters:".to_string());
        lines.extend(
            function
                .parameters
                .iter()
                .map(|p| format!("  • {} {}", p.param_type, p.name).trim_end().to_string()),
        );
    }

    lines
}

fn group_lines(group: &TestGroup) -> Vec<String> {
    let counts = [
        ("Functional Tests", group.functional_tests.len()),
        ("Boundary Tests", group.boundary_tests.len()),
        ("Error Tests", group.error_tests.len()),
        ("Performance Tests", group.performance_tests.len()),
    ];

    let lines: Vec<String> = counts
        .iter()
        .filter(|(_, count)| *count > 0)
        .map(|(label, count)| format!("  • {}: {}", label, count))
        .collect();

    if lines.is_empty() {
        vec!["  (no tests generated)".to_string()]
    } else {
        lines
    }
}
