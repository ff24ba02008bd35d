//! Script generation entry points.
//!
//! `generate` is a single linear pass: preconditions, read, render, write.
//! Every check happens before the output file is created, and the output is
//! opened create-new so an existing file is never overwritten or appended to.

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::error::{DomsubError, Result};
use crate::file_list::FileList;
use crate::rules::{self, RuleFormat};
use crate::script::{self, ScriptOptions};

/// Full set of inputs for one generation run
#[derive(Debug, Clone)]
pub struct GenerateRequest {
    pub rules_path: PathBuf,
    pub files_path: PathBuf,
    pub output_path: PathBuf,
    pub rule_format: RuleFormat,
    pub options: ScriptOptions,
}

impl GenerateRequest {
    /// Request with default format detection and script options
    pub fn new(
        rules_path: impl Into<PathBuf>,
        files_path: impl Into<PathBuf>,
        output_path: impl Into<PathBuf>,
    ) -> Self {
        Self {
            rules_path: rules_path.into(),
            files_path: files_path.into(),
            output_path: output_path.into(),
            rule_format: RuleFormat::default(),
            options: ScriptOptions::default(),
        }
    }
}

/// Generate a domain substitution script with default options.
///
/// # Errors
///
/// - [`DomsubError::NotFound`] if either input list is missing
/// - [`DomsubError::AlreadyExists`] if `output_path` exists
/// - [`DomsubError::MalformedRule`] / [`DomsubError::MalformedFileEntry`]
///   for inputs that cannot be embedded safely
pub fn generate(
    rules_path: impl AsRef<Path>,
    files_path: impl AsRef<Path>,
    output_path: impl AsRef<Path>,
) -> Result<()> {
    generate_with_options(&GenerateRequest::new(
        rules_path.as_ref(),
        files_path.as_ref(),
        output_path.as_ref(),
    ))
}

/// Generate a domain substitution script as described by `request`.
pub fn generate_with_options(request: &GenerateRequest) -> Result<()> {
    check_preconditions(request)?;

    let rules = rules::load_rules(&request.rules_path, request.rule_format)?;
    let files = FileList::load(&request.files_path)?;
    if files.is_empty() {
        warn!(path = %request.files_path.display(), "File list is empty");
    }

    let content = script::render_script(&rules, &files, &request.options);
    write_new(&request.output_path, content.as_bytes())?;

    debug!(
        output = %request.output_path.display(),
        rules = rules.len(),
        files = files.len(),
        "Generated domain substitution script"
    );
    Ok(())
}

fn check_preconditions(request: &GenerateRequest) -> Result<()> {
    for input in [&request.rules_path, &request.files_path] {
        if !input.exists() {
            return Err(DomsubError::NotFound(input.clone()));
        }
    }
    if request.output_path.exists() {
        return Err(DomsubError::AlreadyExists(request.output_path.clone()));
    }
    debug!("Preconditions satisfied");
    Ok(())
}

/// Create `path` and write `content`, never touching an existing file.
/// A partially written file is removed on failure.
fn write_new(path: &Path, content: &[u8]) -> Result<()> {
    let mut open = OpenOptions::new();
    open.write(true).create_new(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        open.mode(0o755);
    }

    let mut file = open.open(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::AlreadyExists {
            DomsubError::AlreadyExists(path.to_path_buf())
        } else {
            DomsubError::io(path, e)
        }
    })?;

    if let Err(e) = file.write_all(content).and_then(|()| file.sync_all()) {
        drop(file);
        if let Err(cleanup) = fs::remove_file(path) {
            warn!(path = %path.display(), error = %cleanup, "Failed to remove partial script");
        }
        return Err(DomsubError::io(path, e));
    }

    Ok(())
}
