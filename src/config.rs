//! Configuration resolution.
//!
//! Settings are merged from three sources in precedence order: command-line
//! values win over configuration-file values, which win over built-in
//! defaults. The result is a single immutable [`Config`] built before any
//! network activity; nothing downstream ever mutates it.

use std::path::Path;

use anyhow::{Context, Result, bail};
use tracing::debug;

/// How the final report is rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputMode {
    #[default]
    Text,
    Json,
}

/// Resolved settings consumed by the rest of the pipeline.
#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub api_key: String,
    pub output: OutputMode,
}

/// Values supplied on the command line. Empty strings count as absent.
#[derive(Debug, Default)]
pub struct Overrides {
    pub host: Option<String>,
    pub key: Option<String>,
    pub json: Option<String>,
}

impl Config {
    /// Merge command-line overrides, the configuration file at `path`, and
    /// defaults into one record. Fails if the file cannot be read or if
    /// `host` / `api_key` are still empty after the merge.
    pub fn resolve(path: &Path, overrides: Overrides) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read configuration file {}", path.display()))?;

        let file = FileValues::scan(&content);

        let host = pick(overrides.host, file.host);
        let api_key = pick(overrides.key, file.key);
        let json = pick(overrides.json, file.json);

        if host.is_empty() {
            bail!("no API host configured (use --host or api_host in the configuration file)");
        }
        if api_key.is_empty() {
            bail!("no API key configured (use --key or api_key in the configuration file)");
        }

        let output = if is_truthy(&json) {
            OutputMode::Json
        } else {
            OutputMode::Text
        };

        debug!(host = %host, ?output, "configuration resolved");

        Ok(Self {
            host,
            api_key,
            output,
        })
    }
}

/// Command-line value wins when non-empty; otherwise the file value,
/// otherwise the default (empty).
fn pick(cli: Option<String>, file: Option<String>) -> String {
    match cli {
        Some(v) if !v.is_empty() => v,
        _ => file.unwrap_or_default(),
    }
}

fn is_truthy(value: &str) -> bool {
    matches!(value.to_lowercase().as_str(), "true" | "yes" | "1")
}

/// Slot a recognized key token points at.
#[derive(Debug, Clone, Copy)]
enum Slot {
    Host,
    Key,
    Json,
}

/// First value found per slot while scanning the configuration file.
#[derive(Debug, Default)]
struct FileValues {
    host: Option<String>,
    key: Option<String>,
    json: Option<String>,
}

impl FileValues {
    /// Scan the line-oriented configuration text.
    ///
    /// `#`-prefixed lines and blank lines are skipped; every other line is
    /// tokenized on whitespace. A recognized key sets a pending-assignment
    /// flag for its slot; a `=` token arms the assignment; the next token
    /// fills the armed slot and disarms it; anything else is discarded.
    /// Keys are case-insensitive and only recognized while their slot is
    /// still unset, so the first value in file order wins.
    fn scan(content: &str) -> Self {
        let mut values = Self::default();
        let mut pending: Option<Slot> = None;
        let mut armed = false;

        for line in content.lines() {
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            for token in line.split_whitespace() {
                match token.to_lowercase().as_str() {
                    "api_host" if values.host.is_none() => pending = Some(Slot::Host),
                    "api_key" if values.key.is_none() => pending = Some(Slot::Key),
                    "api_json" if values.json.is_none() => pending = Some(Slot::Json),
                    "=" => armed = true,
                    _ => {
                        if armed && let Some(slot) = pending {
                            let value = Some(token.to_string());
                            match slot {
                                Slot::Host => values.host = value,
                                Slot::Key => values.key = value,
                                Slot::Json => values.json = value,
                            }
                            pending = None;
                            armed = false;
                        }
                    }
                }
            }
        }

        values
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use tempfile::NamedTempFile;

    use super::*;

    fn conf_file(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_scan_basic() {
        let values = FileValues::scan("api_host = art.example.com\napi_key = secret\n");
        assert_eq!(values.host.as_deref(), Some("art.example.com"));
        assert_eq!(values.key.as_deref(), Some("secret"));
        assert!(values.json.is_none());
    }

    #[test]
    fn test_scan_keys_case_insensitive() {
        let values = FileValues::scan("API_HOST = h\nApi_Key = k\nAPI_JSON = true\n");
        assert_eq!(values.host.as_deref(), Some("h"));
        assert_eq!(values.key.as_deref(), Some("k"));
        assert_eq!(values.json.as_deref(), Some("true"));
    }

    #[test]
    fn test_scan_first_value_wins() {
        let values = FileValues::scan("api_host = first\napi_host = second\n");
        assert_eq!(values.host.as_deref(), Some("first"));
    }

    #[test]
    fn test_scan_skips_comments_and_blank_lines() {
        let values = FileValues::scan("# api_host = commented\n\napi_host = real\n");
        assert_eq!(values.host.as_deref(), Some("real"));
    }

    #[test]
    fn test_scan_ignores_unknown_tokens() {
        let values = FileValues::scan("noise api_host more = h trailing\n");
        assert_eq!(values.host.as_deref(), Some("h"));
    }

    #[test]
    fn test_scan_key_without_equals_gets_no_value() {
        // No `=` token ever arms the assignment
        let values = FileValues::scan("api_host h\n");
        assert!(values.host.is_none());
    }

    #[test]
    fn test_resolve_cli_overrides_file() {
        let file = conf_file("api_host = fileHost\napi_key = fileKey\n");
        let overrides = Overrides {
            host: Some("cliHost".to_string()),
            ..Default::default()
        };

        let config = Config::resolve(file.path(), overrides).unwrap();
        assert_eq!(config.host, "cliHost");
        assert_eq!(config.api_key, "fileKey");
    }

    #[test]
    fn test_resolve_file_value_used_when_cli_absent() {
        let file = conf_file("api_host = fileHost\napi_key = fileKey\n");

        let config = Config::resolve(file.path(), Overrides::default()).unwrap();
        assert_eq!(config.host, "fileHost");
        assert_eq!(config.api_key, "fileKey");
    }

    #[test]
    fn test_resolve_empty_cli_value_does_not_override() {
        let file = conf_file("api_host = fileHost\napi_key = fileKey\n");
        let overrides = Overrides {
            host: Some(String::new()),
            ..Default::default()
        };

        let config = Config::resolve(file.path(), overrides).unwrap();
        assert_eq!(config.host, "fileHost");
    }

    #[test]
    fn test_resolve_missing_host_is_fatal() {
        let file = conf_file("api_key = k\n");
        assert!(Config::resolve(file.path(), Overrides::default()).is_err());
    }

    #[test]
    fn test_resolve_missing_key_is_fatal() {
        let file = conf_file("api_host = h\n");
        assert!(Config::resolve(file.path(), Overrides::default()).is_err());
    }

    #[test]
    fn test_resolve_unreadable_file_is_fatal() {
        let overrides = Overrides::default();
        assert!(Config::resolve(Path::new("/nonexistent/topdl.conf"), overrides).is_err());
    }

    #[test]
    fn test_output_mode_truthy_values() {
        for truthy in ["true", "TRUE", "yes", "Yes", "1"] {
            let file = conf_file(&format!("api_host = h\napi_key = k\napi_json = {truthy}\n"));
            let config = Config::resolve(file.path(), Overrides::default()).unwrap();
            assert_eq!(config.output, OutputMode::Json, "value: {truthy}");
        }

        for other in ["false", "no", "0", "json", ""] {
            let file = conf_file(&format!("api_host = h\napi_key = k\napi_json = {other}\n"));
            let config = Config::resolve(file.path(), Overrides::default()).unwrap();
            assert_eq!(config.output, OutputMode::Text, "value: {other:?}");
        }
    }

    #[test]
    fn test_output_mode_cli_overrides_file() {
        let file = conf_file("api_host = h\napi_key = k\napi_json = false\n");
        let overrides = Overrides {
            json: Some("yes".to_string()),
            ..Default::default()
        };

        let config = Config::resolve(file.path(), overrides).unwrap();
        assert_eq!(config.output, OutputMode::Json);
    }
}
