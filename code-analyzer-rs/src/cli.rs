//! Command-line arguments for the analyzer front end.

use std::path::PathBuf;

use analysis_sdk::Module;
use clap::{Args as ClapArgs, Parser, Subcommand};

/// Client for the C/C++ analysis server
///
/// Submits source code to one of three analysis modules and prints the
/// rendered report:
///
/// - debug: compilation check, static metrics and AI root-cause analysis
/// - nlp: function discovery and unit test generation
/// - formal: ACSL contract generation for one function
#[derive(Parser, Debug, Clone)]
#[command(name = "code-analyzer")]
#[command(about = "Client for the C/C++ analysis server")]
#[command(version)]
pub struct Args {
    /// Settings file holding the ApiSettings section
    ///
    /// Values from CODE_ANALYZER_* environment variables take precedence,
    /// e.g. CODE_ANALYZER_APISETTINGS_BASEURL.
    #[arg(long, value_name = "PATH", default_value = "appsettings.json", global = true)]
    pub config: PathBuf,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Run one analysis and print its report
    Analyze(AnalyzeArgs),

    /// Show the readiness of one module
    Status {
        /// Module to query (debug, nlp, formal)
        #[arg(long, short, value_name = "MODULE", default_value = "debug")]
        mode: Module,
    },

    /// List the functions the NLP module has discovered
    Functions,

    /// Probe the server's health endpoint
    Health,
}

impl Command {
    /// Short description used in the exit message
    pub fn label(&self) -> String {
        match self {
            Command::Analyze(analyze) => format!("{} analysis", analyze.mode),
            Command::Status { mode } => format!("{} status query", mode),
            Command::Functions => "Function listing".to_string(),
            Command::Health => "Health check".to_string(),
        }
    }
}

#[derive(ClapArgs, Debug, Clone)]
pub struct AnalyzeArgs {
    /// Module to run (debug, nlp, formal)
    #[arg(long, short, value_name = "MODULE", default_value = "debug")]
    pub mode: Module,

    /// C/C++ source file to analyze; reads stdin when neither --file nor --code is given
    #[arg(long, short, value_name = "PATH", conflicts_with = "code")]
    pub file: Option<PathBuf>,

    /// Source code passed inline
    #[arg(long, value_name = "SOURCE")]
    pub code: Option<String>,

    /// Function to verify (formal mode)
    #[arg(long = "function", value_name = "NAME", default_value = "")]
    pub function_name: String,

    /// Filename reported to the debugger; defaults to the --file name, then temp.c
    #[arg(long, value_name = "NAME")]
    pub filename: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_analyze() {
        let args = Args::parse_from([
            "code-analyzer",
            "analyze",
            "--mode",
            "formal",
            "--file",
            "abs.c",
            "--function",
            "abs_val",
        ]);

        match args.command {
            Command::Analyze(analyze) => {
                assert_eq!(analyze.mode, Module::FormalVerification);
                assert_eq!(analyze.file, Some(PathBuf::from("abs.c")));
                assert_eq!(analyze.function_name, "abs_val");
                assert_eq!(analyze.filename, None);
            }
            other => panic!("expected analyze, got {:?}", other),
        }
        assert_eq!(args.config, PathBuf::from("appsettings.json"));
    }

    #[test]
    fn test_unknown_mode_rejected() {
        let result = Args::try_parse_from(["code-analyzer", "status", "--mode", "profiling"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_file_and_code_conflict() {
        let result = Args::try_parse_from([
            "code-analyzer",
            "analyze",
            "--file",
            "a.c",
            "--code",
            "int x;",
        ]);
        assert!(result.is_err());
    }
}
