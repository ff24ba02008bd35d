//! Rendering of the standalone domain substitution script.
//!
//! The script has three parts, kept visually separate in the output:
//!
//! 1. **Guard**: `test -f <marker>` under `sh -e`, so running it outside the
//!    expected tree root aborts before anything is touched.
//! 2. **Backup**: the file list is piped into `tar` to archive every listed
//!    file verbatim.
//! 3. **Substitute**: the file list is piped through `xargs` into a single
//!    `perl -0777 -pwi` invocation that applies every rule, in order, to the
//!    whole content of each file.

use crate::file_list::{FileList, HEREDOC_TERMINATOR};
use crate::rules::Rule;

/// Marker file checked relative to the working directory
pub const DEFAULT_MARKER: &str = "build/config/compiler/BUILD.gn";

/// Name of the backup archive created before substitution
pub const DEFAULT_BACKUP_NAME: &str = "domain-substitution.orig.tar";

/// Tunables for the generated script
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptOptions {
    /// Path whose presence identifies the tree root
    pub marker: String,
    /// Archive written by the backup phase
    pub backup_name: String,
}

impl Default for ScriptOptions {
    fn default() -> Self {
        Self {
            marker: DEFAULT_MARKER.to_string(),
            backup_name: DEFAULT_BACKUP_NAME.to_string(),
        }
    }
}

/// Render the complete script for `rules` applied to `files`.
pub fn render_script(rules: &[Rule], files: &FileList, options: &ScriptOptions) -> String {
    let mut script = String::new();

    // Guard
    script.push_str(
        "#!/bin/sh -e\n\
         #\n\
         # This script performs domain substitution on the listed source files.\n\
         #\n\
         # Generated by domsub. Run it once from the root of the source tree;\n\
         # the original files are saved to the backup archive first.\n\
         #\n\
         \n\
         # Check that we are inside the expected source tree\n",
    );
    script.push_str(&format!("test -f {}\n\n", shell_word(&options.marker)));

    script.push_str("# These filenames may contain spaces and/or other unusual characters\n");
    script.push_str("print_file_list() {\n");
    script.push_str(&format!("\tcat <<'{HEREDOC_TERMINATOR}'\n"));
    for entry in files.entries() {
        script.push_str(entry);
        script.push('\n');
    }
    script.push_str(&format!("{HEREDOC_TERMINATOR}\n}}\n\n"));

    // Backup
    script.push_str("echo \"Creating backup archive ...\"\n\n");
    script.push_str(&format!("backup={}\n", shell_word(&options.backup_name)));
    script.push_str("print_file_list | tar cf \"$backup\" --verbatim-files-from --files-from=-\n\n");

    // Substitute
    script.push_str(&format!(
        "echo \"Applying domain substitution to {} files ...\"\n\n",
        files.len()
    ));
    script.push_str("print_file_list | xargs -d '\\n' perl -0777 -C0 -pwi -e '\n");
    for rule in rules {
        script.push_str(&format!(
            "    {};\n",
            escape_single_quotes(&rule.to_perl_substitution())
        ));
    }
    script.push_str("'\n\n# end\n");

    script
}

/// Make text safe inside a single-quoted shell word.
fn escape_single_quotes(text: &str) -> String {
    text.replace('\'', r"'\''")
}

/// Quote a value for the shell unless it is made only of safe characters.
fn shell_word(value: &str) -> String {
    let safe = !value.is_empty()
        && value
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '/' | '.' | '_' | '-' | '+'));
    if safe {
        value.to_string()
    } else {
        format!("'{}'", escape_single_quotes(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_files() -> FileList {
        ["src/config.txt", "chrome/app/my file.cc"].into_iter().collect()
    }

    #[test]
    fn test_render_structure_order() {
        let rules = vec![Rule::new(r"foo\.com", r"example\.com")];
        let script = render_script(&rules, &sample_files(), &ScriptOptions::default());

        assert!(script.starts_with("#!/bin/sh -e\n"));
        let guard = script.find("test -f build/config/compiler/BUILD.gn").unwrap();
        let list = script.find("print_file_list() {").unwrap();
        let backup = script.find("tar cf").unwrap();
        let substitute = script.find("perl -0777").unwrap();
        assert!(guard < list && list < backup && backup < substitute);

        assert!(script.contains("backup=domain-substitution.orig.tar\n"));
        assert!(script.contains("Applying domain substitution to 2 files ..."));
        assert!(script.contains("    s#foo\\.com#example\\.com#g;\n"));
        assert!(script.ends_with("# end\n"));
    }

    #[test]
    fn test_render_file_list_block() {
        let script = render_script(&[], &sample_files(), &ScriptOptions::default());
        assert!(script.contains(
            "\tcat <<'__END__'\nsrc/config.txt\nchrome/app/my file.cc\n__END__\n}\n"
        ));
    }

    #[test]
    fn test_render_one_statement_per_rule() {
        let rules = vec![
            Rule::new("a", "b"),
            Rule::new("c", "d"),
            Rule::new("e", "f"),
        ];
        let script = render_script(&rules, &sample_files(), &ScriptOptions::default());
        let statements: Vec<&str> = script
            .lines()
            .filter(|line| line.starts_with("    s#"))
            .collect();
        assert_eq!(statements, vec!["    s#a#b#g;", "    s#c#d#g;", "    s#e#f#g;"]);
    }

    #[test]
    fn test_render_escapes_single_quotes() {
        let rules = vec![Rule::new("it's", "it is")];
        let script = render_script(&rules, &FileList::default(), &ScriptOptions::default());
        assert!(script.contains(r"    s#it'\''s#it is#g;"));
    }

    #[test]
    fn test_render_custom_options() {
        let options = ScriptOptions {
            marker: "BUILD root.gn".to_string(),
            backup_name: "backup.tar".to_string(),
        };
        let script = render_script(&[], &FileList::default(), &options);
        assert!(script.contains("test -f 'BUILD root.gn'\n"));
        assert!(script.contains("backup=backup.tar\n"));
        assert!(script.contains("Applying domain substitution to 0 files ..."));
    }

    #[test]
    fn test_shell_word() {
        assert_eq!(shell_word("build/config/BUILD.gn"), "build/config/BUILD.gn");
        assert_eq!(shell_word("a b"), "'a b'");
        assert_eq!(shell_word("it's"), r"'it'\''s'");
        assert_eq!(shell_word(""), "''");
    }
}
