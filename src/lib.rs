//! domsub library
//!
//! Turns a list of substitution rules and a list of target files into a
//! standalone shell script that backs up the files and rewrites them in place.

pub mod cli;
pub mod error;
pub mod file_list;
pub mod generator;
pub mod rules;
pub mod script;

// Re-export main types for convenience
pub use error::{DomsubError, Result};
pub use file_list::FileList;
pub use generator::{GenerateRequest, generate, generate_with_options};
pub use rules::{Rule, RuleFormat, translate_group_refs};
pub use script::{ScriptOptions, render_script};
