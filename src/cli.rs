//! Command-line interface argument parsing.
//!
//! This module handles all CLI argument parsing using clap,
//! including validation and default values.

use clap::Parser;
use std::path::PathBuf;

/// SkillGap - LLM-powered strengths/gaps summaries from skill assessments
///
/// Reads candidate responses, groups the questions by skill, and asks a
/// chat-completion endpoint for a summary of strengths and gaps.
///
/// Examples:
///   skillgap
///   skillgap --input ./responses.json --output analysis.txt
///   skillgap --show-prompt
///   skillgap --save-prompt prompt.md   # edit it, then:
///   skillgap --prompt-file prompt.md
///   skillgap --init-config
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Args {
    /// Response file to analyze (JSON array of records)
    ///
    /// Defaults to ./data.json, or [general].input from the config file.
    #[arg(short, long, value_name = "FILE")]
    pub input: Option<PathBuf>,

    /// Output file for the analysis result
    ///
    /// Overwritten on every successful run. Defaults to overall_analysis.txt.
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Output format (text, json)
    #[arg(long, default_value = "text", value_name = "FORMAT")]
    pub format: OutputFormat,

    /// Path to configuration file
    ///
    /// If not specified, looks for .skillgap.toml in the current directory
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Chat-completion endpoint URL
    #[arg(long, value_name = "URL", env = "AZURE_OPENAI_ENDPOINT")]
    pub endpoint: Option<String>,

    /// API key sent in the api-key header
    #[arg(long, value_name = "KEY", env = "AZURE_OPENAI_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Maximum tokens in the model's answer
    #[arg(long, value_name = "COUNT")]
    pub max_tokens: Option<u32>,

    /// Sampling temperature (0.0 - 2.0)
    #[arg(long)]
    pub temperature: Option<f32>,

    /// Nucleus sampling threshold (0.0 - 1.0)
    #[arg(long)]
    pub top_p: Option<f32>,

    /// Print the generated prompt and exit without calling the model
    #[arg(long, conflicts_with_all = ["save_prompt", "prompt_file"])]
    pub show_prompt: bool,

    /// Write the generated prompt to FILE for editing and exit
    #[arg(long, value_name = "FILE", conflicts_with = "prompt_file")]
    pub save_prompt: Option<PathBuf>,

    /// Submit the (edited) prompt in FILE instead of the generated one
    #[arg(long, value_name = "FILE")]
    pub prompt_file: Option<PathBuf>,

    /// Enable verbose logging output
    #[arg(short, long)]
    pub verbose: bool,

    /// Run in quiet mode (minimal output)
    #[arg(short, long)]
    pub quiet: bool,

    /// Generate a default .skillgap.toml configuration file
    #[arg(long)]
    pub init_config: bool,
}

/// Output format for the analysis artifact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// Plain analysis text (default)
    #[default]
    Text,
    /// JSON report with run metadata
    Json,
}

impl Args {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Validate the parsed arguments.
    pub fn validate(&self) -> Result<(), String> {
        if self.init_config {
            return Ok(());
        }

        if self.verbose && self.quiet {
            return Err("Cannot use both --verbose and --quiet".to_string());
        }

        if let Some(ref prompt_file) = self.prompt_file {
            if !prompt_file.is_file() {
                return Err(format!(
                    "Prompt file does not exist: {}",
                    prompt_file.display()
                ));
            }
        }

        Ok(())
    }

    /// Whether this invocation will call the remote model.
    pub fn needs_remote(&self) -> bool {
        !self.init_config && !self.show_prompt && self.save_prompt.is_none()
    }

    /// Returns the log level based on verbosity settings.
    pub fn log_level(&self) -> tracing::Level {
        if self.quiet {
            tracing::Level::ERROR
        } else if self.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_args() -> Args {
        Args {
            input: None,
            output: None,
            format: OutputFormat::Text,
            config: None,
            endpoint: None,
            api_key: None,
            max_tokens: None,
            temperature: None,
            top_p: None,
            show_prompt: false,
            save_prompt: None,
            prompt_file: None,
            verbose: false,
            quiet: false,
            init_config: false,
        }
    }

    #[test]
    fn test_validation_conflicting_options() {
        let mut args = make_args();
        args.verbose = true;
        args.quiet = true;
        assert!(args.validate().is_err());
    }

    #[test]
    fn test_validation_missing_prompt_file() {
        let mut args = make_args();
        args.prompt_file = Some(PathBuf::from("/nonexistent/prompt.md"));
        assert!(args.validate().is_err());
    }

    #[test]
    fn test_needs_remote() {
        let mut args = make_args();
        assert!(args.needs_remote());

        args.show_prompt = true;
        assert!(!args.needs_remote());

        args.show_prompt = false;
        args.save_prompt = Some(PathBuf::from("prompt.md"));
        assert!(!args.needs_remote());
    }

    #[test]
    fn test_parse_flags() {
        let args = Args::try_parse_from([
            "skillgap",
            "--input",
            "responses.json",
            "--format",
            "json",
            "--temperature",
            "0.3",
            "--show-prompt",
        ])
        .unwrap();

        assert_eq!(args.input, Some(PathBuf::from("responses.json")));
        assert_eq!(args.format, OutputFormat::Json);
        assert_eq!(args.temperature, Some(0.3));
        assert!(args.show_prompt);
    }

    #[test]
    fn test_show_prompt_conflicts_with_prompt_file() {
        let result = Args::try_parse_from([
            "skillgap",
            "--show-prompt",
            "--prompt-file",
            "prompt.md",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_log_level() {
        let mut args = make_args();
        assert_eq!(args.log_level(), tracing::Level::INFO);

        args.verbose = true;
        assert_eq!(args.log_level(), tracing::Level::DEBUG);

        args.verbose = false;
        args.quiet = true;
        assert_eq!(args.log_level(), tracing::Level::ERROR);
    }
}
