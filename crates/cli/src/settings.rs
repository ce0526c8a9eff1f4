//! Run settings: built-in defaults, optionally overridden by a TOML file.
//!
//! The file is read from a fixed location in the working directory. Every key
//! is optional; missing keys keep their default. Example:
//!
//! ```toml
//! planka_url = "https://planka.example.com"
//! username = "archiver@example.com"
//! password = "..."
//! retention_days = 14
//! done_list_name = "Done"
//! archive_board_id = "1650000000000000000"
//!
//! [[mappings]]
//! source_board = "1650000000000000101"
//! archive_list = "1650000000000000201"
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use archiver::{
    ArchiveMapping, ArchiveSettings, ArchiverError, BoardId, ListId, RetentionWindow,
    DEFAULT_DONE_LIST_NAME, UNCONFIGURED_LIST_ID,
};
use planka::ConnectionSettings;
use serde::Deserialize;

/// Settings file looked up in the working directory.
pub const SETTINGS_FILE: &str = "planka-archive.toml";

/// Log file written next to the settings file.
pub const DEFAULT_LOG_FILE: &str = "planka_archive.log";

const PLACEHOLDER_URL: &str = "http://your_planka_url";
const PLACEHOLDER_USERNAME: &str = "your_planka_account";
const PLACEHOLDER_PASSWORD: &str = "password";
const PLACEHOLDER_ARCHIVE_BOARD: &str = "ARCHIVE_BOARD_ID";
const PLACEHOLDER_SOURCE_BOARD: &str = "SOURCE_BOARD_ID";

/// One `[[mappings]]` entry as written in the settings file.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MappingEntry {
    pub source_board: String,
    pub archive_list: String,
}

/// Settings as read from defaults and the settings file, before validation.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    pub planka_url: String,
    pub username: String,
    pub password: String,
    pub retention_days: u32,
    pub done_list_name: String,
    pub archive_board_id: String,
    pub mappings: Vec<MappingEntry>,
    pub log_file: PathBuf,
    pub request_timeout_secs: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            planka_url: PLACEHOLDER_URL.to_owned(),
            username: PLACEHOLDER_USERNAME.to_owned(),
            password: PLACEHOLDER_PASSWORD.to_owned(),
            retention_days: RetentionWindow::DEFAULT_DAYS,
            done_list_name: DEFAULT_DONE_LIST_NAME.to_owned(),
            archive_board_id: PLACEHOLDER_ARCHIVE_BOARD.to_owned(),
            mappings: vec![MappingEntry {
                source_board: PLACEHOLDER_SOURCE_BOARD.to_owned(),
                archive_list: UNCONFIGURED_LIST_ID.to_owned(),
            }],
            log_file: PathBuf::from(DEFAULT_LOG_FILE),
            request_timeout_secs: 30,
        }
    }
}

impl Settings {
    /// Loads settings from `path`, or returns the defaults when it does not exist.
    pub fn load(path: &Path) -> Result<Self, ArchiverError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let text = std::fs::read_to_string(path).map_err(|e| ArchiverError::ConfigurationError {
            message: format!("cannot read {}: {e}", path.display()),
        })?;
        Self::from_toml_str(&text).map_err(|e| ArchiverError::ConfigurationError {
            message: format!("{}: {e}", path.display()),
        })
    }

    pub fn from_toml_str(text: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(text)
    }

    /// Fails when the credentials are empty or still the shipped placeholders.
    pub fn check_credentials(&self) -> Result<(), ArchiverError> {
        let unset = |value: &str, placeholder: &str| value.trim().is_empty() || value == placeholder;
        if unset(&self.username, PLACEHOLDER_USERNAME) || unset(&self.password, PLACEHOLDER_PASSWORD)
        {
            return Err(ArchiverError::MissingCredentials);
        }
        Ok(())
    }

    pub fn archive_board(&self) -> Result<BoardId, ArchiverError> {
        BoardId::new(self.archive_board_id.trim()).ok_or_else(|| ArchiverError::ConfigurationError {
            message: "archive_board_id is empty".to_owned(),
        })
    }

    /// Converts the file-level settings into typed orchestrator settings.
    pub fn archive_settings(&self) -> Result<ArchiveSettings, ArchiverError> {
        let mappings = self
            .mappings
            .iter()
            .enumerate()
            .map(|(index, entry)| {
                let source = BoardId::new(entry.source_board.trim());
                let list = ListId::new(entry.archive_list.trim());
                match (source, list) {
                    (Some(source), Some(list)) => Ok(ArchiveMapping::new(source, list)),
                    _ => Err(ArchiverError::ConfigurationError {
                        message: format!("mapping #{} has an empty board or list id", index + 1),
                    }),
                }
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(ArchiveSettings {
            retention: RetentionWindow::days(self.retention_days),
            done_list_name: self.done_list_name.clone(),
            archive_board: self.archive_board()?,
            mappings,
        })
    }

    /// Runs every pre-flight check and returns the orchestrator settings.
    ///
    /// # Errors
    ///
    /// - [`ArchiverError::MissingCredentials`] for unset credentials.
    /// - [`ArchiverError::ConfigurationError`] for empty ids.
    /// - [`ArchiverError::UnconfiguredMappings`] when any archive list is still
    ///   the placeholder.
    pub fn validate(&self) -> Result<ArchiveSettings, ArchiverError> {
        self.check_credentials()?;
        let archive = self.archive_settings()?;
        let boards = archive.unconfigured_boards();
        if !boards.is_empty() {
            return Err(ArchiverError::UnconfiguredMappings { boards });
        }
        Ok(archive)
    }

    pub fn connection(&self) -> ConnectionSettings {
        ConnectionSettings {
            base_url: self.planka_url.clone(),
            username: self.username.clone(),
            password: self.password.clone(),
            timeout: Duration::from_secs(self.request_timeout_secs),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    const CONFIGURED: &str = r#"
        planka_url = "https://planka.example.com"
        username = "archiver@example.com"
        password = "hunter2"
        archive_board_id = "900"

        [[mappings]]
        source_board = "100"
        archive_list = "901"

        [[mappings]]
        source_board = "200"
        archive_list = "902"
    "#;

    #[test]
    fn file_overrides_defaults_and_keeps_mapping_order() {
        let settings = Settings::from_toml_str(CONFIGURED).unwrap();
        let archive = settings.validate().unwrap();

        assert_eq!(archive.retention, RetentionWindow::days(14));
        assert_eq!(archive.done_list_name, "Done");
        assert_eq!(archive.archive_board.as_str(), "900");
        let sources: Vec<_> = archive
            .mappings
            .iter()
            .map(|m| m.source_board.as_str())
            .collect();
        assert_eq!(sources, ["100", "200"]);
        assert_eq!(settings.log_file, PathBuf::from(DEFAULT_LOG_FILE));
        assert_eq!(settings.connection().timeout, Duration::from_secs(30));
    }

    #[test]
    fn defaults_fail_on_placeholder_credentials() {
        let err = Settings::default().validate().unwrap_err();
        assert!(matches!(err, ArchiverError::MissingCredentials));
    }

    #[test]
    fn blank_password_is_rejected() {
        let settings = Settings {
            username: "archiver".to_owned(),
            password: "  ".to_owned(),
            ..Settings::default()
        };
        assert!(matches!(
            settings.check_credentials(),
            Err(ArchiverError::MissingCredentials)
        ));
    }

    #[test]
    fn placeholder_archive_lists_are_fatal() {
        let mut settings = Settings::from_toml_str(CONFIGURED).unwrap();
        settings.mappings[1].archive_list = UNCONFIGURED_LIST_ID.to_owned();

        match settings.validate().unwrap_err() {
            ArchiverError::UnconfiguredMappings { boards } => {
                assert_eq!(boards, vec![BoardId::new("200").unwrap()]);
            }
            other => panic!("expected UnconfiguredMappings, got {other:?}"),
        }
    }

    #[test]
    fn empty_mapping_ids_are_configuration_errors() {
        let mut settings = Settings::from_toml_str(CONFIGURED).unwrap();
        settings.mappings[0].source_board = String::new();

        assert!(matches!(
            settings.validate(),
            Err(ArchiverError::ConfigurationError { .. })
        ));
    }

    #[test]
    fn unknown_keys_are_rejected() {
        assert!(Settings::from_toml_str("retention = 3").is_err());
    }

    #[test]
    fn load_reads_file_or_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join(SETTINGS_FILE);
        assert_eq!(Settings::load(&missing).unwrap(), Settings::default());

        let mut file = std::fs::File::create(&missing).unwrap();
        writeln!(file, "retention_days = 30").unwrap();
        writeln!(file, "done_list_name = \"Shipped\"").unwrap();
        drop(file);

        let loaded = Settings::load(&missing).unwrap();
        assert_eq!(loaded.retention_days, 30);
        assert_eq!(loaded.done_list_name, "Shipped");
        assert_eq!(loaded.username, PLACEHOLDER_USERNAME);
    }

    #[test]
    fn malformed_file_is_a_configuration_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(SETTINGS_FILE);
        std::fs::write(&path, "retention_days = \"two weeks\"").unwrap();

        assert!(matches!(
            Settings::load(&path),
            Err(ArchiverError::ConfigurationError { .. })
        ));
    }
}
