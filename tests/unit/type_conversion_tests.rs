//! Unit tests for raw type metadata normalization
//!
//! Cases mirror the column declarations a `create table TestTable(FirstName <decl>)`
//! round-trip through `sys.dm_exec_describe_first_result_set` produces.

use uniquedb::introspect::DescribeResultSetRow;
use uniquedb::types::{
    convert, CharLength, DialectProfile, RawTypeAttributes, RawTypeRow, SqlType,
};

const PROFILE: DialectProfile = DialectProfile::SQL_SERVER;

/// Describe row as the server reports it for a single-column table
fn described(system_type_name: &str, max_length: i32, precision: u8, scale: u8) -> DescribeResultSetRow {
    DescribeResultSetRow {
        column_ordinal: 1,
        name: Some("FirstName".to_string()),
        is_nullable: true,
        system_type_name: system_type_name.to_string(),
        max_length,
        precision,
        scale,
        user_type_name: None,
    }
}

fn converted(row: &DescribeResultSetRow) -> SqlType {
    row.to_sql_column(&PROFILE).sql_type
}

// ============================================================================
// Declared Column Cases
// ============================================================================

#[test]
fn test_int() {
    let sql_type = converted(&described("int", 4, 10, 0));
    assert_eq!(sql_type, SqlType::name_only("int"));
    assert_eq!(sql_type.numeric_precision, None);
}

#[test]
fn test_decimal_default() {
    assert_eq!(
        converted(&described("decimal(18,0)", 9, 18, 0)),
        SqlType::decimal("decimal", 18, 0)
    );
}

#[test]
fn test_decimal_precision() {
    assert_eq!(
        converted(&described("decimal(25,0)", 13, 25, 0)),
        SqlType::decimal("decimal", 25, 0)
    );
}

#[test]
fn test_decimal_precision_and_scale() {
    assert_eq!(
        converted(&described("decimal(30,5)", 17, 30, 5)),
        SqlType::decimal("decimal", 30, 5)
    );
}

#[test]
fn test_datetime() {
    let sql_type = converted(&described("datetime", 8, 23, 3));
    assert_eq!(sql_type, SqlType::name_only("datetime"));
    assert_eq!(sql_type.fractional_seconds_precision, None);
}

#[test]
fn test_datetime2_default() {
    assert_eq!(
        converted(&described("datetime2(7)", 8, 27, 7)),
        SqlType::fractional_time("datetime2", 7)
    );
}

#[test]
fn test_datetime2_with_precision() {
    assert_eq!(
        converted(&described("datetime2(4)", 7, 24, 4)),
        SqlType::fractional_time("datetime2", 4)
    );
}

#[test]
fn test_user_defined_type_from_nvarchar() {
    let alias = DescribeResultSetRow {
        user_type_name: Some("mytypespecial".to_string()),
        ..described("nvarchar(10)", 20, 0, 0)
    };
    let sql_type = converted(&alias);
    assert_eq!(sql_type.type_name, "nvarchar");
    assert_eq!(sql_type.maximum_char_length, Some(CharLength::Chars(10)));
    assert_eq!(sql_type, converted(&described("nvarchar(10)", 20, 0, 0)));
}

#[test]
fn test_nvarchar_max() {
    assert_eq!(
        converted(&described("nvarchar(max)", -1, 0, 0)),
        SqlType::character("nvarchar", CharLength::Max)
    );
}

// ============================================================================
// Descriptor Invariants
// ============================================================================

#[test]
fn test_at_most_one_category_is_populated() {
    let cases = [
        described("int", 4, 10, 0),
        described("money", 8, 19, 4),
        described("decimal(9,2)", 5, 9, 2),
        described("varchar(20)", 20, 0, 0),
        described("nchar(4)", 8, 0, 0),
        described("time(3)", 4, 12, 3),
        described("datetimeoffset(7)", 10, 34, 7),
        described("uniqueidentifier", 16, 0, 0),
        described("geography", -1, 0, 0),
        described("varbinary(max)", -1, 0, 0),
    ];
    for row in &cases {
        let sql_type = converted(row);
        assert!(
            sql_type.validate().is_ok(),
            "{} produced {:?}",
            row.system_type_name,
            sql_type
        );
    }
}

#[test]
fn test_decimal_fields_only_for_decimal_family() {
    let money = converted(&described("money", 8, 19, 4));
    assert_eq!(money, SqlType::name_only("money"));
}

#[test]
fn test_unresolvable_alias_degrades_to_name_only() {
    let row = RawTypeRow::system(RawTypeAttributes {
        max_length: Some(16),
        ..RawTypeAttributes::named("NotARealType")
    });
    let sql_type = convert(&row, &PROFILE);
    assert_eq!(sql_type, SqlType::name_only("notarealtype"));
}

#[test]
fn test_converted_declaration_parses_back() {
    for (decl, max_length, precision, scale) in [
        ("nvarchar(10)", 20, 0, 0),
        ("varchar(max)", -1, 0, 0),
        ("decimal(30,5)", 17, 30, 5),
        ("datetime2(4)", 7, 24, 4),
        ("bigint", 8, 19, 0),
    ] {
        let sql_type = converted(&described(decl, max_length, precision, scale));
        let reparsed = SqlType::parse_declaration(&sql_type.to_declaration(), &PROFILE).unwrap();
        assert_eq!(reparsed, sql_type, "{}", decl);
    }
}
