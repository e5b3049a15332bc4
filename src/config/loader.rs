//! Configuration file loading

use super::ConfigError;
use crate::telemetry::LogFormat;
use crate::utils::validators::ValidationError;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Extra `git commit` arguments, written either as one string or a list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CommitArgs {
    Line(String),
    List(Vec<String>),
}

impl CommitArgs {
    pub fn into_args(self) -> Result<Vec<String>, ValidationError> {
        match self {
            CommitArgs::Line(line) => {
                split_args(&line).map_err(|reason| ValidationError::InvalidValue {
                    argument: "commit-args".to_string(),
                    value: line.clone(),
                    reason: reason.to_string(),
                })
            }
            CommitArgs::List(args) => Ok(args),
        }
    }
}

/// Split an argument string into words the way a POSIX shell does
///
/// Single quotes keep their content verbatim. Inside double quotes a
/// backslash only escapes `"`, `\`, `$` and backtick. Outside quotes a
/// backslash escapes any character. Nothing is expanded.
pub fn split_args(line: &str) -> Result<Vec<String>, &'static str> {
    let mut args = Vec::new();
    let mut word = String::new();
    let mut in_word = false;
    let mut chars = line.chars();

    while let Some(c) = chars.next() {
        match c {
            '\'' => {
                in_word = true;
                loop {
                    match chars.next() {
                        Some('\'') => break,
                        Some(c) => word.push(c),
                        None => return Err("unterminated single quote"),
                    }
                }
            }
            '"' => {
                in_word = true;
                loop {
                    match chars.next() {
                        Some('"') => break,
                        Some('\\') => match chars.next() {
                            Some(c @ ('"' | '\\' | '$' | '`')) => word.push(c),
                            Some(c) => {
                                word.push('\\');
                                word.push(c);
                            }
                            None => return Err("unterminated double quote"),
                        },
                        Some(c) => word.push(c),
                        None => return Err("unterminated double quote"),
                    }
                }
            }
            '\\' => {
                in_word = true;
                word.push(chars.next().unwrap_or('\\'));
            }
            c if c.is_whitespace() => {
                if in_word {
                    args.push(std::mem::take(&mut word));
                    in_word = false;
                }
            }
            c => {
                in_word = true;
                word.push(c);
            }
        }
    }
    if in_word {
        args.push(word);
    }
    Ok(args)
}

/// Defaults read from a YAML file
///
/// There is no token key; secrets come from flags or
/// the environment only.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    pub branch: Option<String>,
    pub timeout: Option<u64>,
    pub interval: Option<u64>,
    pub sleep: Option<u64>,
    pub commit: Option<bool>,
    pub commit_message: Option<String>,
    pub commit_args: Option<CommitArgs>,
    pub author_name: Option<String>,
    pub author_email: Option<String>,
    pub committer_name: Option<String>,
    pub committer_email: Option<String>,
    pub repository: Option<String>,
    pub api_url: Option<String>,
    pub path: Option<String>,
    pub log_format: Option<LogFormat>,
    pub debug: Option<bool>,
}

impl FileConfig {
    /// Load configuration from a file
    pub fn load(path: &str) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_string(),
            source,
        })?;
        Self::parse(&content).map_err(|source| ConfigError::Parse {
            path: path.to_string(),
            source,
        })
    }

    pub fn parse(content: &str) -> Result<Self, serde_yaml::Error> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(content)
    }

    /// Load the file if one is named and exists
    pub fn load_optional(path: Option<&str>) -> Result<Self, ConfigError> {
        match path {
            Some(path) if !path.trim().is_empty() => {
                if !Path::new(path).exists() {
                    return Err(ConfigError::Read {
                        path: path.to_string(),
                        source: std::io::Error::new(
                            std::io::ErrorKind::NotFound,
                            "config file does not exist",
                        ),
                    });
                }
                Self::load(path)
            }
            _ => Ok(Self::default()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_full_file() {
        let config = FileConfig::parse(
            r#"
branch: release
timeout: 600
interval: 15
commit: true
commit_message: "chore: regenerate"
commit_args: ["--allow-empty", "--no-verify"]
author_name: Release Bot
author_email: bot@example.com
log_format: json
"#,
        )
        .unwrap();

        assert_eq!(config.branch.as_deref(), Some("release"));
        assert_eq!(config.timeout, Some(600));
        assert_eq!(config.interval, Some(15));
        assert_eq!(config.commit, Some(true));
        assert_eq!(
            config.commit_args.unwrap().into_args().unwrap(),
            vec!["--allow-empty", "--no-verify"]
        );
        assert_eq!(config.log_format, Some(LogFormat::Json));
    }

    #[test]
    fn test_commit_args_as_string() {
        let config = FileConfig::parse("commit_args: --allow-empty  --no-verify\n").unwrap();
        assert_eq!(
            config.commit_args.unwrap().into_args().unwrap(),
            vec!["--allow-empty", "--no-verify"]
        );
    }

    #[test]
    fn test_split_args_keeps_quoted_words_together() {
        assert_eq!(
            split_args(r#"--author="Jane Doe <jane@example.com>" --no-verify"#).unwrap(),
            vec!["--author=Jane Doe <jane@example.com>", "--no-verify"]
        );
        assert_eq!(
            split_args(r#"--trailer 'Signed-off-by: A "B" C' -q"#).unwrap(),
            vec!["--trailer", r#"Signed-off-by: A "B" C"#, "-q"]
        );
        assert_eq!(
            split_args(r#"a\ b "x\"y" '' "c\d""#).unwrap(),
            vec!["a b", "x\"y", "", r"c\d"]
        );
        assert!(split_args("  ").unwrap().is_empty());
    }

    #[test]
    fn test_split_args_rejects_unterminated_quote() {
        assert_eq!(split_args("--author='Jane"), Err("unterminated single quote"));
        assert_eq!(split_args(r#"-m "half"#), Err("unterminated double quote"));

        let err = CommitArgs::Line("--author=\"Jane".to_string())
            .into_args()
            .unwrap_err();
        assert!(err.to_string().contains("commit-args"));
    }

    #[test]
    fn test_token_is_rejected() {
        let err = FileConfig::parse("token: ghp_secret\n").unwrap_err();
        assert!(err.to_string().contains("token"));
    }

    #[test]
    fn test_empty_file_is_default() {
        assert_eq!(FileConfig::parse("  \n").unwrap(), FileConfig::default());
    }

    #[test]
    fn test_load_from_disk() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "branch: develop\ninterval: 5").unwrap();
        let config = FileConfig::load(file.path().to_str().unwrap()).unwrap();
        assert_eq!(config.branch.as_deref(), Some("develop"));
        assert_eq!(config.interval, Some(5));
    }

    #[test]
    fn test_load_optional_missing_file_errors() {
        let err = FileConfig::load_optional(Some("/no/such/protected-push.yaml")).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
        assert_eq!(FileConfig::load_optional(None).unwrap(), FileConfig::default());
    }
}
