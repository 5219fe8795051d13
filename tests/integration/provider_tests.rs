//! Integration tests for unique database naming from options files

use chrono::NaiveDate;

use uniquedb::provider::{default_stale_age, is_stale};
use uniquedb::{UniqueDbOptions, UniqueDbProvider};

use crate::common::TestContext;

#[test]
fn test_provider_from_options_file() {
    let ctx = TestContext::new();
    let path = ctx.write_file(
        "uniquedb.xml",
        r#"<UniqueDb>
  <SqlServerName>ws2012sqlexp1\sqlexpress</SqlServerName>
  <DatabaseNamePrefix>autodisposedatabase</DatabaseNamePrefix>
</UniqueDb>"#,
    );
    let options = UniqueDbOptions::from_file(&path).unwrap();
    let created = NaiveDate::from_ymd_opt(2023, 11, 30)
        .unwrap()
        .and_hms_milli_opt(23, 59, 58, 7)
        .unwrap();
    let provider = UniqueDbProvider::new_at(options, created).unwrap();

    assert_eq!(
        provider.database_name(),
        "autodisposedatabase_231130.235958.007"
    );
    assert_eq!(provider.server_name(), "ws2012sqlexp1\\sqlexpress");
    assert_eq!(
        provider.connection_string(),
        "Data Source=ws2012sqlexp1\\sqlexpress;Initial Catalog=autodisposedatabase_231130.235958.007;Integrated Security=True"
    );

    let later = created + chrono::TimeDelta::minutes(6);
    assert!(is_stale(
        provider.database_name(),
        "autodisposedatabase",
        &provider.options().timestamp_format,
        later,
        default_stale_age(),
    )
    .unwrap());
}

#[test]
fn test_generated_names_are_distinct_across_milliseconds() {
    let base = NaiveDate::from_ymd_opt(2024, 1, 1)
        .unwrap()
        .and_hms_milli_opt(8, 0, 0, 0)
        .unwrap();
    let first = UniqueDbProvider::new_at(UniqueDbOptions::new(".", "T"), base).unwrap();
    let second = UniqueDbProvider::new_at(
        UniqueDbOptions::new(".", "T"),
        base + chrono::TimeDelta::milliseconds(1),
    )
    .unwrap();
    assert_ne!(first.database_name(), second.database_name());
}

#[test]
fn test_unsupported_format_is_rejected() {
    let options = UniqueDbOptions::with_timestamp(".", "T", true, "hh:mm tt");
    assert!(UniqueDbProvider::new(options).is_err());
}
