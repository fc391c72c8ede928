//! Plain-text report rendering
//!
//! Every renderer is a pure function from a decoded response to a `Report`:
//! an ordered list of titled sections. Section order is fixed per module,
//! the first section is always `SUMMARY`, and a sub-report with nothing in it
//! produces no section at all. Rendering cannot fail; missing optional data
//! shows up as a placeholder.

mod debug;
mod formal;
mod nlp;

pub use debug::render_debug;
pub use formal::render_formal;
pub use nlp::render_nlp;

use std::fmt;

use crate::dispatch::route;
use crate::error::{ClientError, ErrorKind, TransportFailureKind};
use crate::schema::{AnalysisResponse, FunctionsResponse, Module, StatusSnapshot};

/// Width of the horizontal rules framing a report
pub const RULE_WIDTH: usize = 57;

/// Title of the leading section of every report
pub const SUMMARY: &str = "SUMMARY";

const HEAVY_RULE: char = '═';
const LIGHT_RULE: char = '─';

/// One titled block of report text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    pub title: String,
    pub body: String,
}

/// Rendered output of one response; displayed once and then discarded
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    pub heading: String,
    pub sections: Vec<Section>,
}

impl Report {
    /// Create an empty report
    pub fn new(heading: impl Into<String>) -> Self {
        Self {
            heading: heading.into(),
            sections: Vec::new(),
        }
    }

    /// Append a section built from `lines`; nothing is appended when `lines` is empty
    pub fn push(&mut self, title: impl Into<String>, lines: Vec<String>) {
        if lines.is_empty() {
            return;
        }
        self.sections.push(Section {
            title: title.into(),
            body: lines.join("\n"),
        });
    }

    /// Look up a section by title
    pub fn section(&self, title: &str) -> Option<&Section> {
        self.sections.iter().find(|s| s.title == title)
    }

    /// Section titles in order
    pub fn titles(&self) -> Vec<&str> {
        self.sections.iter().map(|s| s.title.as_str()).collect()
    }

    /// Render the framed plain-text form
    pub fn to_text(&self) -> String {
        let heavy = rule(HEAVY_RULE);
        let light = rule(LIGHT_RULE);

        let mut out = String::new();
        out.push_str(&heavy);
        out.push('\n');
        out.push_str(&center(&self.heading));
        out.push('\n');
        out.push_str(&heavy);
        out.push_str("\n\n");

        for section in &self.sections {
            out.push_str(&light);
            out.push('\n');
            out.push_str(&section.title);
            out.push('\n');
            out.push_str(&light);
            out.push('\n');
            out.push_str(section.body.trim_end());
            out.push_str("\n\n");
        }

        out.push_str(&heavy);
        out.push('\n');
        out
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_text())
    }
}

fn rule(c: char) -> String {
    std::iter::repeat(c).take(RULE_WIDTH).collect()
}

fn center(text: &str) -> String {
    let width = text.chars().count();
    if width >= RULE_WIDTH {
        return text.to_string();
    }
    let pad = (RULE_WIDTH - width) / 2;
    format!("{}{}", " ".repeat(pad), text)
}

/// Ratio 0.0-1.0 as a percentage with one decimal
pub fn percent_one_decimal(ratio: f64) -> String {
    format!("{:.1}%", finite_or_zero(ratio) * 100.0)
}

/// Ratio 0.0-1.0 as a whole percentage
pub fn percent_whole(ratio: f64) -> String {
    format!("{:.0}%", finite_or_zero(ratio) * 100.0)
}

fn finite_or_zero(value: f64) -> f64 {
    if value.is_finite() {
        value
    } else {
        0.0
    }
}

pub(crate) fn yes_no(flag: bool) -> &'static str {
    if flag {
        "Yes"
    } else {
        "No"
    }
}

/// Blank strings become `placeholder`
pub(crate) fn or_placeholder<'a>(value: &'a str, placeholder: &'a str) -> &'a str {
    if value.trim().is_empty() {
        placeholder
    } else {
        value
    }
}

/// Render a response with the renderer its module's route names
pub fn render(response: &AnalysisResponse) -> Report {
    (route(response.module()).render)(response)
}

/// Render a module status snapshot; unset capabilities are left out
pub fn status_report(module: Module, snapshot: &StatusSnapshot) -> Report {
    let mut report = Report::new(format!("{} STATUS", module.label().to_uppercase()));

    report.push(
        SUMMARY,
        vec![format!(
            "Status: {}",
            or_placeholder(snapshot.status.as_deref().unwrap_or(""), "unknown")
        )],
    );

    let flags = [
        ("ChatDBG available", snapshot.chatdbg_available),
        ("LLM debugger available", snapshot.llmdebugger_available),
        ("GDB available", snapshot.gdb_available),
        ("Models loaded", snapshot.models_loaded),
        ("Frama-C available", snapshot.framac_available),
        ("LLM available", snapshot.llm_available),
    ];

    let mut capabilities: Vec<String> = flags
        .iter()
        .filter_map(|(label, flag)| flag.map(|f| format!("{}: {}", label, yes_no(f))))
        .collect();

    if let Some(device) = snapshot.device.as_deref().filter(|d| !d.trim().is_empty()) {
        capabilities.push(format!("Device: {}", device));
    }
    if let Some(count) = snapshot.functions_discovered {
        capabilities.push(format!("Functions discovered: {}", count));
    }

    report.push("CAPABILITIES", capabilities);
    report
}

/// Render the function listing of the NLP module
pub fn functions_report(response: &FunctionsResponse) -> Report {
    let mut report = Report::new("DISCOVERED FUNCTIONS");

    let count = if response.count == 0 {
        response.functions.len() as u32
    } else {
        response.count
    };
    report.push(SUMMARY, vec![format!("Functions: {}", count)]);

    let lines = response
        .functions
        .iter()
        .map(|f| {
            let mut line = format!("  • {}", f.name);
            if !f.signature.trim().is_empty() {
                line.push_str(&format!(": {}", f.signature.trim()));
            }
            if !f.file.trim().is_empty() {
                line.push_str(&format!(" [{}]", f.file.trim()));
            }
            line
        })
        .collect();
    report.push("FUNCTIONS", lines);

    report
}

/// Explanatory report for a failed analysis, so stale output is never left on screen
pub fn failure_report(module: Module, error: &ClientError) -> Report {
    let mut report = Report::new(format!("{} FAILED", module.label().to_uppercase()));

    report.push(
        SUMMARY,
        vec![
            "Status: failed".to_string(),
            format!("Reason: {}", or_placeholder(error.cause(), "unknown error")),
        ],
    );

    let hint = match error.kind() {
        ErrorKind::Validation => "Check the input fields and submit again.",
        ErrorKind::Transport(TransportFailureKind::Timeout) => {
            "The analysis server did not answer within the configured timeout."
        }
        ErrorKind::Transport(_) => "The analysis server could not be reached. Is it running?",
        ErrorKind::Remote => "The analysis server rejected the request.",
        ErrorKind::Decode => "The analysis server returned a response this client does not understand.",
        ErrorKind::Configuration => "Check ApiSettings in the client configuration.",
        ErrorKind::Cancelled => "The request was cancelled before it completed.",
    };

    let mut details = vec![hint.to_string()];
    if let Some(status) = error.status_code() {
        details.push(format!("HTTP status: {}", status));
    }
    report.push("DETAILS", details);

    report
}
