//! Integration tests for foreign-key work units

use pretty_assertions::assert_eq;

use uniquedb::error::UniqueDbError;
use uniquedb::{dependency_work_units, SchemaQualifiedName};

use crate::common::TestContext;

fn rendered(units: &[uniquedb::WorkUnit]) -> Vec<String> {
    units.iter().map(ToString::to_string).collect()
}

#[test]
fn test_work_units_from_customer() {
    let ctx = TestContext::new();
    let root: SchemaQualifiedName = "dbo.Customer".parse().unwrap();
    let units = dependency_work_units(&ctx.shop_schema_dump(), &root).unwrap();

    assert_eq!(
        rendered(&units),
        vec![
            "[dbo].[Customer]".to_string(),
            "[dbo].[Customer] -> [dbo].[Order]".to_string(),
            "[dbo].[Customer] -> [dbo].[Address]".to_string(),
            "[dbo].[Customer] -> [dbo].[Order] -> [dbo].[OrderLine]".to_string(),
        ]
    );
}

#[test]
fn test_leaf_table_has_single_unit() {
    let ctx = TestContext::new();
    let root = SchemaQualifiedName::new("dbo", "OrderLine");
    let units = dependency_work_units(&ctx.shop_schema_dump(), &root).unwrap();
    assert_eq!(units.len(), 1);
    assert_eq!(units[0].depth(), 0);
}

#[test]
fn test_unknown_root_is_an_error() {
    let ctx = TestContext::new();
    let root = SchemaQualifiedName::new("dbo", "Nope");
    assert!(dependency_work_units(&ctx.shop_schema_dump(), &root).is_err());
}

#[test]
fn test_cyclic_references_are_reported() {
    let ctx = TestContext::new();
    let path = ctx.write_file(
        "cycle.xml",
        r#"<table TABLE_SCHEMA="dbo" TABLE_NAME="A"/>
<table TABLE_SCHEMA="dbo" TABLE_NAME="B"/>
<constraint CONSTRAINT_NAME="FK_B_A" CONSTRAINT_TYPE="FOREIGN KEY" TABLE_SCHEMA="dbo" TABLE_NAME="B" COLUMN_NAME="AId" REFERENCED_TABLE_SCHEMA="dbo" REFERENCED_TABLE_NAME="A"/>
<constraint CONSTRAINT_NAME="FK_A_B" CONSTRAINT_TYPE="FOREIGN KEY" TABLE_SCHEMA="dbo" TABLE_NAME="A" COLUMN_NAME="BId" REFERENCED_TABLE_SCHEMA="dbo" REFERENCED_TABLE_NAME="B"/>"#,
    );

    let root = SchemaQualifiedName::new("dbo", "A");
    let err = dependency_work_units(&path, &root).unwrap_err();
    let cause = err.downcast_ref::<UniqueDbError>().unwrap();
    assert!(matches!(cause, UniqueDbError::CyclicHierarchy { .. }));
}
