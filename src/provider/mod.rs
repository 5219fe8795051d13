//! Naming and SQL text for disposable, uniquely named databases
//!
//! Everything here is pure: the provider decides names and produces the
//! statements a caller runs against the server.

mod timestamp;

pub use timestamp::to_chrono_format;

use chrono::{Local, NaiveDate, NaiveDateTime, TimeDelta};
use tracing::{debug, info};

use crate::error::Result;
use crate::options::{Credentials, UniqueDbOptions};

/// Age after which a generated database is considered abandoned
pub fn default_stale_age() -> TimeDelta {
    TimeDelta::minutes(5)
}

/// A database name fixed at construction, plus the options it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UniqueDbProvider {
    options: UniqueDbOptions,
    database_name: String,
}

impl UniqueDbProvider {
    /// Name the database using the current local time.
    pub fn new(options: UniqueDbOptions) -> Result<Self> {
        Self::new_at(options, Local::now().naive_local())
    }

    /// Name the database as if created at `now`.
    pub fn new_at(options: UniqueDbOptions, now: NaiveDateTime) -> Result<Self> {
        let database_name = database_name_at(&options, now)?;
        debug!("Generated database name {}", database_name);
        Ok(Self {
            options,
            database_name,
        })
    }

    pub fn database_name(&self) -> &str {
        &self.database_name
    }

    pub fn server_name(&self) -> &str {
        &self.options.sql_server_name
    }

    pub fn options(&self) -> &UniqueDbOptions {
        &self.options
    }

    pub fn connection_string(&self) -> String {
        self.connection_string_for(&self.database_name)
    }

    /// Connection string for the `master` database, used to create and drop
    /// the generated one.
    pub fn master_connection_string(&self) -> String {
        self.connection_string_for("master")
    }

    fn connection_string_for(&self, catalog: &str) -> String {
        let mut parts = vec![
            ("Data Source", self.options.sql_server_name.as_str()),
            ("Initial Catalog", catalog),
        ];
        match &self.options.credentials {
            Credentials::Integrated => parts.push(("Integrated Security", "True")),
            Credentials::SqlLogin {
                user_name,
                password,
            } => {
                parts.push(("User ID", user_name.as_str()));
                parts.push(("Password", password.as_str()));
            }
        }
        parts
            .into_iter()
            .map(|(key, value)| format!("{}={}", key, connection_string_value(value)))
            .collect::<Vec<_>>()
            .join(";")
    }

    pub fn create_database_sql(&self) -> String {
        format!("CREATE DATABASE {};", quote_identifier(&self.database_name))
    }

    /// Drop the database, first forcing out any open connections.
    pub fn drop_database_sql(&self) -> String {
        drop_database_sql(&self.database_name)
    }

    pub fn check_table_existence_sql(&self, schema: &str, table: &str) -> String {
        check_table_existence_sql(schema, table)
    }

    pub fn truncate_table_sql(&self, schema: &str, table: &str) -> String {
        format!(
            "TRUNCATE TABLE {}.{};",
            quote_identifier(schema),
            quote_identifier(table)
        )
    }

    pub fn drop_table_sql(&self, schema: &str, table: &str) -> String {
        format!(
            "DROP TABLE {}.{};",
            quote_identifier(schema),
            quote_identifier(table)
        )
    }

    /// Lists databases created with this provider's prefix.
    pub fn list_prefixed_databases_sql(&self) -> String {
        format!(
            "SELECT name FROM sys.databases WHERE name LIKE N'{}[_]%';",
            escape_like(&self.options.database_name_prefix).replace('\'', "''")
        )
    }

    /// Databases among `names` created with this provider's prefix and format
    /// that are older than `max_age` at `now`.
    pub fn stale_databases<'a>(
        &self,
        names: impl IntoIterator<Item = &'a str>,
        now: NaiveDateTime,
        max_age: TimeDelta,
    ) -> Result<Vec<String>> {
        let mut stale = Vec::new();
        for name in names {
            if name == self.database_name {
                continue;
            }
            if is_stale(
                name,
                &self.options.database_name_prefix,
                &self.options.timestamp_format,
                now,
                max_age,
            )? {
                info!("Database {} is older than {} and can be dropped", name, max_age);
                stale.push(name.to_string());
            }
        }
        Ok(stale)
    }
}

/// `{prefix}` or `{prefix}_{timestamp}` depending on the options.
pub fn database_name_at(options: &UniqueDbOptions, now: NaiveDateTime) -> Result<String> {
    if !options.include_timestamp {
        return Ok(options.database_name_prefix.clone());
    }
    let format = to_chrono_format(&options.timestamp_format)?;
    Ok(format!(
        "{}_{}",
        options.database_name_prefix,
        now.format(&format)
    ))
}

/// Whether `database_name` was generated from `prefix` with `format` more
/// than `max_age` before `now`. Names that don't parse are never stale.
pub fn is_stale(
    database_name: &str,
    prefix: &str,
    format: &str,
    now: NaiveDateTime,
    max_age: TimeDelta,
) -> Result<bool> {
    let chrono_format = to_chrono_format(format)?;
    let Some(stamp) = database_name
        .strip_prefix(prefix)
        .and_then(|rest| rest.strip_prefix('_'))
    else {
        return Ok(false);
    };

    // Date-only formats carry no time of day, so they count from midnight.
    let created = NaiveDateTime::parse_from_str(stamp, &chrono_format)
        .ok()
        .or_else(|| {
            NaiveDate::parse_from_str(stamp, &chrono_format)
                .ok()
                .and_then(|date| date.and_hms_opt(0, 0, 0))
        });
    Ok(created.is_some_and(|created| now - created > max_age))
}

pub fn drop_database_sql(database_name: &str) -> String {
    let quoted = quote_identifier(database_name);
    format!(
        "ALTER DATABASE {quoted} SET SINGLE_USER WITH ROLLBACK IMMEDIATE;\nDROP DATABASE {quoted};"
    )
}

pub fn check_table_existence_sql(schema: &str, table: &str) -> String {
    format!(
        "SELECT CASE WHEN EXISTS (SELECT 1 FROM INFORMATION_SCHEMA.TABLES WHERE TABLE_SCHEMA = N'{}' AND TABLE_NAME = N'{}') THEN 1 ELSE 0 END;",
        schema.replace('\'', "''"),
        table.replace('\'', "''")
    )
}

/// Quote a connection string value when it would otherwise change the
/// key/value structure. Double quotes are preferred; single quotes are used
/// when the value holds `"` but no `'`.
pub fn connection_string_value(value: &str) -> String {
    let needs_quoting = value.contains([';', '=', '"', '\''])
        || value.trim() != value;
    if !needs_quoting {
        return value.to_string();
    }
    if value.contains('"') && !value.contains('\'') {
        format!("'{}'", value)
    } else {
        format!("\"{}\"", value.replace('"', "\"\""))
    }
}

/// Bracket an identifier, doubling any closing bracket inside it.
pub fn quote_identifier(ident: &str) -> String {
    format!("[{}]", ident.replace(']', "]]"))
}

fn escape_like(pattern: &str) -> String {
    pattern
        .replace('[', "[[]")
        .replace('%', "[%]")
        .replace('_', "[_]")
}
