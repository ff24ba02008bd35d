use clap::Parser;
use std::path::PathBuf;

use crate::generator::GenerateRequest;
use crate::rules::RuleFormat;
use crate::script::{DEFAULT_BACKUP_NAME, DEFAULT_MARKER, ScriptOptions};

/// domsub - generate a standalone domain substitution script
#[derive(Parser, Debug)]
#[command(name = "domsub")]
#[command(about = "Generate a standalone shell script that performs domain substitution")]
#[command(version)]
pub struct Cli {
    /// Path to the rule list (domain_regex.list or a JSON rule list)
    #[arg(short, long)]
    pub regex: PathBuf,

    /// Path to the list of files to substitute (domain_substitution.list)
    #[arg(short, long)]
    pub files: PathBuf,

    /// Path to the script file to create (must not exist)
    #[arg(short, long)]
    pub output: PathBuf,

    /// Encoding of the rule list: auto, delimited or json
    #[arg(long, default_value = "auto")]
    pub rule_format: RuleFormat,

    /// File that must exist in the working directory when the script runs
    #[arg(long, default_value = DEFAULT_MARKER)]
    pub marker: String,

    /// Name of the backup archive the script creates
    #[arg(long, default_value = DEFAULT_BACKUP_NAME)]
    pub backup_name: String,

    /// Enable debug logging (RUST_LOG takes precedence)
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    pub fn parse_args() -> Self {
        <Self as clap::Parser>::parse()
    }

    /// Fold the parsed arguments into a generation request
    pub fn to_request(&self) -> GenerateRequest {
        GenerateRequest {
            rules_path: self.regex.clone(),
            files_path: self.files.clone(),
            output_path: self.output.clone(),
            rule_format: self.rule_format,
            options: ScriptOptions {
                marker: self.marker.clone(),
                backup_name: self.backup_name.clone(),
            },
        }
    }
}
