//! Options for provisioning uniquely named databases

use std::path::Path;

use roxmltree::Document;
use tracing::info;

use crate::error::{Result, UniqueDbError};

/// Timestamp appended to generated database names unless overridden
pub const DEFAULT_TIMESTAMP_FORMAT: &str = "yyMMdd.HHmmss.fff";

/// How connections authenticate against the server
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Credentials {
    Integrated,
    SqlLogin { user_name: String, password: String },
}

/// Server, naming scheme and credentials for a disposable database.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UniqueDbOptions {
    pub sql_server_name: String,
    pub database_name_prefix: String,
    /// Append a timestamp to the prefix; without it every database gets the
    /// same name
    pub include_timestamp: bool,
    /// .NET-style timestamp format (`yy`, `MM`, `dd`, `HH`, `mm`, `ss`, `fff`)
    pub timestamp_format: String,
    pub credentials: Credentials,
}

impl UniqueDbOptions {
    pub fn new(sql_server_name: &str, database_name_prefix: &str) -> Self {
        Self::with_timestamp(
            sql_server_name,
            database_name_prefix,
            true,
            DEFAULT_TIMESTAMP_FORMAT,
        )
    }

    pub fn with_timestamp(
        sql_server_name: &str,
        database_name_prefix: &str,
        include_timestamp: bool,
        timestamp_format: &str,
    ) -> Self {
        Self {
            sql_server_name: sql_server_name.to_string(),
            database_name_prefix: database_name_prefix.to_string(),
            include_timestamp,
            timestamp_format: timestamp_format.to_string(),
            credentials: Credentials::Integrated,
        }
    }

    pub fn with_credentials(
        sql_server_name: &str,
        database_name_prefix: &str,
        user_name: &str,
        password: &str,
    ) -> Self {
        Self::with_timestamp_and_credentials(
            sql_server_name,
            database_name_prefix,
            true,
            DEFAULT_TIMESTAMP_FORMAT,
            user_name,
            password,
        )
    }

    pub fn with_timestamp_and_credentials(
        sql_server_name: &str,
        database_name_prefix: &str,
        include_timestamp: bool,
        timestamp_format: &str,
        user_name: &str,
        password: &str,
    ) -> Self {
        Self {
            credentials: Credentials::SqlLogin {
                user_name: user_name.to_string(),
                password: password.to_string(),
            },
            ..Self::with_timestamp(
                sql_server_name,
                database_name_prefix,
                include_timestamp,
                timestamp_format,
            )
        }
    }

    pub fn uses_integrated_security(&self) -> bool {
        self.credentials == Credentials::Integrated
    }

    /// Load options from an XML file:
    ///
    /// ```xml
    /// <UniqueDb>
    ///   <SqlServerName>.\SQLEXPRESS</SqlServerName>
    ///   <DatabaseNamePrefix>IntegrationTests</DatabaseNamePrefix>
    ///   <IncludeTimeStamp>true</IncludeTimeStamp>
    ///   <TimeStampFormat>yyMMdd.HHmmss.fff</TimeStampFormat>
    ///   <UserName>sa</UserName>
    ///   <Password>secret</Password>
    /// </UniqueDb>
    /// ```
    ///
    /// Credentials are used only when `UserName` is present.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| UniqueDbError::OptionsReadError {
            path: path.to_path_buf(),
            source: e,
        })?;

        let doc = Document::parse(&content).map_err(|e| UniqueDbError::OptionsParseError {
            path: path.to_path_buf(),
            source: e,
        })?;

        let options = Self::from_document(&doc)?;
        info!(
            "Loaded options from {} (server {}, prefix {})",
            path.display(),
            options.sql_server_name,
            options.database_name_prefix
        );
        Ok(options)
    }

    fn from_document(doc: &Document) -> Result<Self> {
        let root = doc.root_element();

        let sql_server_name = require_property(&root, "SqlServerName")?;
        let database_name_prefix = require_property(&root, "DatabaseNamePrefix")?;

        let include_timestamp = match find_property_value(&root, "IncludeTimeStamp") {
            None => true,
            Some(value) => parse_flag(&value).ok_or_else(|| UniqueDbError::InvalidOptions {
                message: format!("IncludeTimeStamp must be true or false, got '{}'", value),
            })?,
        };

        let timestamp_format = find_property_value(&root, "TimeStampFormat")
            .unwrap_or_else(|| DEFAULT_TIMESTAMP_FORMAT.to_string());

        let options = match find_property_value(&root, "UserName") {
            Some(user_name) => Self::with_timestamp_and_credentials(
                &sql_server_name,
                &database_name_prefix,
                include_timestamp,
                &timestamp_format,
                &user_name,
                &find_property_value(&root, "Password").unwrap_or_default(),
            ),
            None => Self::with_timestamp(
                &sql_server_name,
                &database_name_prefix,
                include_timestamp,
                &timestamp_format,
            ),
        };
        Ok(options)
    }
}

fn find_property_value(root: &roxmltree::Node, property_name: &str) -> Option<String> {
    root.descendants()
        .find(|node| node.tag_name().name() == property_name)
        .and_then(|node| node.text())
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

fn require_property(root: &roxmltree::Node, property_name: &str) -> Result<String> {
    find_property_value(root, property_name).ok_or_else(|| UniqueDbError::InvalidOptions {
        message: format!("{} is required", property_name),
    })
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" => Some(true),
        "false" | "0" | "no" => Some(false),
        _ => None,
    }
}
