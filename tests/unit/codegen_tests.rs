//! Unit tests for C# property and class rendering

use pretty_assertions::assert_eq;

use uniquedb::codegen::{
    generate_class, generate_class_from_describe_rows, generate_classes, parse_declaration_line,
    property_for_column, AccessModifier, CSharpProperty, DataAnnotation, GeneratorOptions,
};
use uniquedb::introspect::DescribeResultSetRow;
use uniquedb::schema::{
    InformationSchemaColumn, InformationSchemaTable, SchemaDefinition, TableConstraintInfo,
    PRIMARY_KEY_CONSTRAINT_TYPE,
};
use uniquedb::types::{CharLength, SqlType};

fn table(name: &str) -> InformationSchemaTable {
    InformationSchemaTable {
        table_catalog: None,
        table_schema: "dbo".to_string(),
        table_name: name.to_string(),
        table_type: "BASE TABLE".to_string(),
    }
}

fn column(
    table: &str,
    name: &str,
    ordinal: i32,
    data_type: &str,
    is_nullable: bool,
) -> InformationSchemaColumn {
    InformationSchemaColumn {
        table_schema: "dbo".to_string(),
        table_name: table.to_string(),
        column_name: name.to_string(),
        ordinal_position: ordinal,
        is_nullable,
        data_type: data_type.to_string(),
        ..Default::default()
    }
}

fn product_definition() -> SchemaDefinition {
    let mut name = column("Product", "Name", 2, "nvarchar", false);
    name.character_maximum_length = Some(200);
    let mut price = column("Product", "Price", 3, "decimal", true);
    price.numeric_precision = Some(10);
    price.numeric_scale = Some(2);
    let mut photo = column("Product", "Photo", 4, "varbinary", true);
    photo.character_maximum_length = Some(-1);

    SchemaDefinition::new(
        table("Product"),
        vec![
            column("Product", "Id", 1, "uniqueidentifier", false),
            name,
            price,
            photo,
        ],
        vec![TableConstraintInfo {
            constraint_name: "PK_Product".to_string(),
            constraint_type: PRIMARY_KEY_CONSTRAINT_TYPE.to_string(),
            table_schema: "dbo".to_string(),
            table_name: "Product".to_string(),
            column_name: "Id".to_string(),
            ..Default::default()
        }],
    )
}

// ============================================================================
// Property Rendering
// ============================================================================

#[test]
fn test_property_line_format() {
    let property = CSharpProperty {
        is_nullable: true,
        setter_access_modifier: AccessModifier::Protected,
        annotations: vec![DataAnnotation::Required],
        ..CSharpProperty::new("Count", "int")
    };
    assert_eq!(
        property.render("    ", "\r\n").unwrap(),
        "    [Required]\r\n    public int? Count { get; protected set; }"
    );
}

#[test]
fn test_rendered_line_round_trips() {
    let cases = [
        CSharpProperty::new("Id", "int"),
        CSharpProperty {
            is_nullable: true,
            ..CSharpProperty::new("When", "DateTime")
        },
        CSharpProperty {
            is_nullable: true,
            ..CSharpProperty::new("Name", "string")
        },
        CSharpProperty {
            access_modifier: AccessModifier::ProtectedInternal,
            getter_access_modifier: AccessModifier::Private,
            ..CSharpProperty::new("Data", "byte[]")
        },
    ];

    for property in &cases {
        let rendered = property.render("    ", "\r\n").unwrap();
        let line = rendered.lines().last().unwrap();
        let parsed = parse_declaration_line(line).unwrap();

        assert_eq!(parsed.name, property.name);
        assert_eq!(parsed.data_type, property.data_type);
        let expect_suffix = property.is_nullable && property.data_type != "string";
        assert_eq!(parsed.is_nullable, expect_suffix, "{}", line);
    }
}

#[test]
fn test_property_for_column_annotations() {
    let property = property_for_column(
        "Code",
        &SqlType::character("char", CharLength::Chars(3)),
        false,
        true,
    );
    assert_eq!(
        property.annotations,
        vec![
            DataAnnotation::Key,
            DataAnnotation::Required,
            DataAnnotation::StringLength(3),
        ]
    );
}

// ============================================================================
// Class Rendering
// ============================================================================

#[test]
fn test_generate_class_for_table() {
    let class = generate_class(&product_definition(), &GeneratorOptions::default()).unwrap();
    let expected = [
        "public class Product",
        "{",
        "    [Key]",
        "    public Guid Id { get; set; }",
        "    [Required]",
        "    [StringLength(200)]",
        "    public string Name { get; set; }",
        "    public decimal? Price { get; set; }",
        "    public byte[] Photo { get; set; }",
        "}",
        "",
    ]
    .join("\r\n");
    assert_eq!(class, expected);
}

#[test]
fn test_generate_class_with_lf_and_internal() {
    let options = GeneratorOptions {
        newline: "\n".to_string(),
        class_access_modifier: AccessModifier::Internal,
        ..GeneratorOptions::default()
    };
    let definition = SchemaDefinition::new(
        table("Flag"),
        vec![column("Flag", "IsSet", 1, "bit", true)],
        vec![],
    );
    assert_eq!(
        generate_class(&definition, &options).unwrap(),
        "internal class Flag\n{\n    public bool? IsSet { get; set; }\n}\n"
    );
}

#[test]
fn test_generate_class_with_clashing_member_names() {
    let definition = SchemaDefinition::new(
        table("Item"),
        vec![
            column("Item", "First Name", 1, "int", false),
            column("Item", "First_Name", 2, "int", false),
            column("Item", "Item", 3, "int", false),
        ],
        vec![],
    );
    let class = generate_class(&definition, &GeneratorOptions::default()).unwrap();
    let expected = [
        "public class Item",
        "{",
        "    [Column(\"First Name\")]",
        "    public int First_Name { get; set; }",
        "    [Column(\"First_Name\")]",
        "    public int First_Name_1 { get; set; }",
        "    [Column(\"Item\")]",
        "    public int Item_1 { get; set; }",
        "}",
        "",
    ]
    .join("\r\n");
    assert_eq!(class, expected);
}

#[test]
fn test_generate_class_from_describe_rows() {
    let rows = vec![
        DescribeResultSetRow {
            column_ordinal: 1,
            name: Some("Total".to_string()),
            is_nullable: false,
            system_type_name: "money".to_string(),
            max_length: 8,
            precision: 19,
            scale: 4,
            user_type_name: None,
        },
        DescribeResultSetRow {
            column_ordinal: 2,
            name: None,
            is_nullable: true,
            system_type_name: "varchar(max)".to_string(),
            max_length: -1,
            precision: 0,
            scale: 0,
            user_type_name: None,
        },
    ];
    let class =
        generate_class_from_describe_rows("Summary", &rows, &GeneratorOptions::default()).unwrap();
    let expected = [
        "public class Summary",
        "{",
        "    public decimal Total { get; set; }",
        "    [MaxLength]",
        "    public string Column2 { get; set; }",
        "}",
        "",
    ]
    .join("\r\n");
    assert_eq!(class, expected);
}

#[test]
fn test_generate_classes_keeps_input_order() {
    let definitions: Vec<SchemaDefinition> = (0..20)
        .map(|i| {
            let name = format!("Table{:02}", i);
            SchemaDefinition::new(
                table(&name),
                vec![column(&name, "Id", 1, "int", false)],
                vec![],
            )
        })
        .collect();

    let classes = generate_classes(&definitions, &GeneratorOptions::default()).unwrap();
    assert_eq!(classes.len(), 20);
    for (i, class) in classes.iter().enumerate() {
        assert!(
            class.starts_with(&format!("public class Table{:02}\r\n", i)),
            "class {} out of order",
            i
        );
    }
}

#[test]
fn test_generate_classes_propagates_mismatch() {
    let definition = SchemaDefinition::new(
        table("Users"),
        vec![column("Orders", "Id", 1, "int", false)],
        vec![],
    );
    assert!(generate_classes(&[definition], &GeneratorOptions::default()).is_err());
}
