//! Parsing utilities for table and field attributes
//!
//! This module handles the parsing of `#[table]`, `#[primary_key]`,
//! `#[handle]` and `#[field]` attributes, classification of merge fields into
//! scalar and nested kinds, and validation of table and field names.

use quote::quote;
use syn::{
    parse::Parse, parse::ParseStream, Attribute, Data, Error, Fields, Ident, Meta, Result, Token,
};

/// Validate table name and return syn::Error for better proc macro error handling
pub fn validate_table_name_syn(name: &str, span: proc_macro2::Span) -> Result<()> {
    validate_identifier(name)
        .map_err(|e| Error::new(span, format!("Invalid table name '{}': {}", name, e)))
}

/// Validate field name and return syn::Error for better proc macro error handling
pub fn validate_field_name_syn(name: &str, span: proc_macro2::Span) -> Result<()> {
    validate_identifier(name)
        .map_err(|e| Error::new(span, format!("Invalid field name '{}': {}", name, e)))
}

/// Validation logic shared by table and column names
fn validate_identifier(name: &str) -> std::result::Result<(), String> {
    if name.is_empty() {
        return Err("Name cannot be empty".to_string());
    }

    // PostgreSQL identifier length limit
    if name.len() > 63 {
        return Err(format!(
            "Name '{}' is too long: {} characters (max 63)",
            name,
            name.len()
        ));
    }

    let first_char = name
        .chars()
        .next()
        .ok_or_else(|| "Name cannot be empty".to_string())?;
    if !first_char.is_ascii_alphabetic() && first_char != '_' {
        return Err(format!(
            "Name '{}' must start with a letter or underscore",
            name
        ));
    }

    if !name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
        return Err(format!(
            "Name '{}' contains invalid characters: only alphanumeric characters and underscores are allowed",
            name
        ));
    }

    if is_reserved_keyword(name) {
        return Err(format!("Name '{}' is a reserved SQL keyword", name));
    }

    Ok(())
}

/// Check if a name is a reserved SQL keyword
fn is_reserved_keyword(name: &str) -> bool {
    const RESERVED_KEYWORDS: &[&str] = &[
        // SQL Standard keywords
        "SELECT", "INSERT", "UPDATE", "DELETE", "FROM", "WHERE", "JOIN", "INNER", "LEFT",
        "RIGHT", "FULL", "OUTER", "ON", "AS", "AND", "OR", "NOT", "NULL", "TRUE", "FALSE",
        "CASE", "WHEN", "THEN", "ELSE", "END", "IF", "EXISTS", "IN", "LIKE", "BETWEEN",
        "ORDER", "BY", "GROUP", "HAVING", "LIMIT", "OFFSET", "UNION", "ALL", "DISTINCT",
        "COUNT", "SUM", "AVG", "MIN", "MAX", "CREATE", "DROP", "ALTER", "TABLE", "INDEX",
        "VIEW", "DATABASE", "SCHEMA", "PRIMARY", "KEY", "FOREIGN", "REFERENCES", "UNIQUE",
        "CHECK", "DEFAULT", "CONSTRAINT", "COLUMN", "ADD", "RENAME", "TO",
        // PostgreSQL specific keywords
        "SERIAL", "BIGSERIAL", "TEXT", "VARCHAR", "CHAR", "INTEGER", "BIGINT", "SMALLINT",
        "DECIMAL", "NUMERIC", "REAL", "DOUBLE", "PRECISION", "BOOLEAN", "DATE", "TIME",
        "TIMESTAMP", "TIMESTAMPTZ", "INTERVAL", "UUID", "JSON", "JSONB", "ARRAY",
        "RETURNING", "CONFLICT", "NOTHING", "EXCLUDED", "TRIGGER", "FUNCTION", "BEGIN",
        // System columns maintained by generated SQL
        "__CREATED_AT__", "__UPDATED_AT__",
    ];

    RESERVED_KEYWORDS.contains(&name.to_ascii_uppercase().as_str())
}

#[derive(Debug)]
struct FieldOperations {
    operations: Vec<Ident>,
}

impl Parse for FieldOperations {
    fn parse(input: ParseStream) -> Result<Self> {
        let mut operations = Vec::new();

        while !input.is_empty() {
            let op: Ident = input.parse()?;
            operations.push(op);

            if input.peek(Token![,]) {
                let _: Token![,] = input.parse()?;
            }
        }

        Ok(FieldOperations { operations })
    }
}

/// The supported scalar kinds of a merge field, keyed off the Rust type
/// inside its `Option`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScalarKind {
    Text,
    Integer,
    BigInt,
    Double,
    Boolean,
    Uuid,
    Timestamp,
    Json,
}

impl ScalarKind {
    pub fn from_inner_type(inner: &str) -> Option<Self> {
        match inner {
            "String" => Some(Self::Text),
            "i32" => Some(Self::Integer),
            "i64" => Some(Self::BigInt),
            "f64" => Some(Self::Double),
            "bool" => Some(Self::Boolean),
            "Uuid" | "uuid::Uuid" => Some(Self::Uuid),
            "DateTime<Utc>" | "chrono::DateTime<Utc>" | "chrono::DateTime<chrono::Utc>" => {
                Some(Self::Timestamp)
            }
            "Value" | "serde_json::Value" => Some(Self::Json),
            _ => None,
        }
    }

    /// Matching `FieldValue` variant name
    pub fn variant_name(&self) -> &'static str {
        match self {
            Self::Text => "Text",
            Self::Integer => "Integer",
            Self::BigInt => "BigInt",
            Self::Double => "Double",
            Self::Boolean => "Boolean",
            Self::Uuid => "Uuid",
            Self::Timestamp => "Timestamp",
            Self::Json => "Json",
        }
    }

    /// PostgreSQL column type for DDL generation
    pub fn pg_type(&self) -> &'static str {
        match self {
            Self::Text => "VARCHAR",
            Self::Integer => "INTEGER",
            Self::BigInt => "BIGINT",
            Self::Double => "DOUBLE PRECISION",
            Self::Boolean => "BOOLEAN",
            Self::Uuid => "UUID",
            Self::Timestamp => "TIMESTAMP WITH TIME ZONE",
            Self::Json => "JSONB",
        }
    }
}

/// One mergeable property, in declaration order
#[derive(Debug)]
pub enum MergeFieldSpec {
    Scalar { ident: Ident, kind: ScalarKind },
    Nested { ident: Ident },
}

impl MergeFieldSpec {
    pub fn ident(&self) -> &Ident {
        match self {
            Self::Scalar { ident, .. } | Self::Nested { ident } => ident,
        }
    }
}

#[derive(Debug)]
pub struct TableInfo {
    pub name: String,
}

#[derive(Debug)]
pub struct EntityFieldInfo {
    pub primary_key_field: Ident,
    pub primary_key_type: String,
    pub handle_field: Ident,
    pub merge_fields: Vec<MergeFieldSpec>,
}

pub fn parse_table_attributes(attrs: &[Attribute]) -> Result<TableInfo> {
    let mut table_name = None;

    for attr in attrs {
        if attr.path().is_ident("table") {
            if let Meta::List(meta_list) = &attr.meta {
                let mut tokens = meta_list.tokens.clone().into_iter().peekable();

                while let Some(token) = tokens.next() {
                    if let proc_macro2::TokenTree::Ident(key) = token {
                        if key == "name" {
                            // Expect '=' then the literal value
                            if let Some(proc_macro2::TokenTree::Punct(punct)) = tokens.peek() {
                                if punct.as_char() == '=' {
                                    tokens.next();
                                    if let Some(proc_macro2::TokenTree::Literal(lit)) =
                                        tokens.next()
                                    {
                                        table_name =
                                            Some(lit.to_string().trim_matches('"').to_string());
                                    }
                                }
                            }
                        }
                    }
                }
            }
        }
    }

    let table_name = table_name.ok_or_else(|| {
        Error::new(
            proc_macro2::Span::call_site(),
            "table attribute is required: add #[table(name = \"table_name\")] to your struct",
        )
    })?;

    validate_table_name_syn(&table_name, proc_macro2::Span::call_site())?;

    Ok(TableInfo { name: table_name })
}

/// Classify the struct's fields for an entity type
///
/// Requires exactly one `#[primary_key]`, exactly one `#[handle]` of type
/// `String`, and at least one `#[field(merge)]` property. Scalar merge fields
/// must be `Option` of a supported kind; `#[field(merge, nested)]` accepts any
/// `Option` of an embedded mergeable type.
pub fn parse_entity_fields(data: &Data) -> Result<EntityFieldInfo> {
    let mut primary_key_field = None;
    let mut primary_key_type = None;
    let mut handle_field = None;
    let merge_fields = parse_merge_fields(data, |field, field_name, normalized_type| {
        // Entity-only attributes, handled alongside the shared merge walk
        if has_attribute(&field.attrs, "primary_key") {
            if primary_key_field.is_some() {
                return Err(Error::new_spanned(
                    field,
                    "only one field may be marked #[primary_key]",
                ));
            }
            match normalized_type {
                "Uuid" | "uuid::Uuid" | "i32" | "i64" => {}
                other => {
                    return Err(Error::new_spanned(
                        field,
                        format!("unsupported primary key type '{}': expected Uuid, i32 or i64", other),
                    ))
                }
            }
            primary_key_field = Some(field_name.clone());
            primary_key_type = Some(normalized_type.to_string());
        }

        if has_attribute(&field.attrs, "handle") {
            if handle_field.is_some() {
                return Err(Error::new_spanned(
                    field,
                    "only one field may be marked #[handle]",
                ));
            }
            if normalized_type != "String" {
                return Err(Error::new_spanned(
                    field,
                    "the #[handle] field must be a String",
                ));
            }
            handle_field = Some(field_name.clone());
        }

        Ok(())
    })?;

    let primary_key_field = primary_key_field.ok_or_else(|| {
        Error::new(
            proc_macro2::Span::call_site(),
            "an entity requires a #[primary_key] field",
        )
    })?;
    let handle_field = handle_field.ok_or_else(|| {
        Error::new(
            proc_macro2::Span::call_site(),
            "an entity requires a #[handle] field: the unique, human-readable secondary key",
        )
    })?;
    if merge_fields.is_empty() {
        return Err(Error::new(
            proc_macro2::Span::call_site(),
            "an entity requires at least one #[field(merge)] property",
        ));
    }

    Ok(EntityFieldInfo {
        primary_key_field,
        primary_key_type: primary_key_type.expect("primary key type recorded with its field"),
        handle_field,
        merge_fields,
    })
}

/// Walk the struct's fields collecting merge specs, invoking `extra` per field
/// for caller-specific attributes
pub fn parse_merge_fields<F>(data: &Data, mut extra: F) -> Result<Vec<MergeFieldSpec>>
where
    F: FnMut(&syn::Field, &Ident, &str) -> Result<()>,
{
    let Data::Struct(data_struct) = data else {
        return Err(Error::new(
            proc_macro2::Span::call_site(),
            "merge schemas can only be derived for structs with named fields",
        ));
    };
    let Fields::Named(fields_named) = &data_struct.fields else {
        return Err(Error::new(
            proc_macro2::Span::call_site(),
            "merge schemas can only be derived for structs with named fields",
        ));
    };

    let mut merge_fields = Vec::new();

    for field in &fields_named.named {
        let field_name = field
            .ident
            .as_ref()
            .ok_or_else(|| Error::new_spanned(field, "Field must have a name"))?;
        let field_name_str = field_name.to_string();

        validate_field_name_syn(&field_name_str, field_name.span())?;

        let ty = &field.ty;
        let type_string = quote!(#ty).to_string();
        // Normalize type string by removing all whitespace for consistent matching
        let normalized_type_string = type_string.replace(" ", "");

        extra(field, field_name, &normalized_type_string)?;

        let Some(operations) = parse_field_operations(&field.attrs) else {
            continue;
        };
        if !operations.iter().any(|op| op == "merge") {
            continue;
        }
        let is_nested = operations.iter().any(|op| op == "nested");

        let Some(inner_type) = option_inner_type(&normalized_type_string) else {
            return Err(Error::new_spanned(
                field,
                "merge fields must be Option<T>: an absent value marks the field as unset",
            ));
        };

        if is_nested {
            merge_fields.push(MergeFieldSpec::Nested {
                ident: field_name.clone(),
            });
        } else {
            let kind = ScalarKind::from_inner_type(inner_type).ok_or_else(|| {
                Error::new_spanned(
                    field,
                    format!(
                        "unsupported merge field type 'Option<{}>': expected String, i32, i64, \
                         f64, bool, Uuid, DateTime<Utc> or serde_json::Value \
                         (use #[field(merge, nested)] for embedded objects)",
                        inner_type
                    ),
                )
            })?;
            merge_fields.push(MergeFieldSpec::Scalar {
                ident: field_name.clone(),
                kind,
            });
        }
    }

    Ok(merge_fields)
}

/// Extract `T` from a normalized `Option<T>` type string
pub fn option_inner_type(normalized: &str) -> Option<&str> {
    normalized
        .strip_prefix("Option<")
        .and_then(|rest| rest.strip_suffix('>'))
}

pub fn has_attribute(attrs: &[Attribute], name: &str) -> bool {
    attrs.iter().any(|attr| attr.path().is_ident(name))
}

pub fn parse_field_operations(attrs: &[Attribute]) -> Option<Vec<String>> {
    for attr in attrs {
        if attr.path().is_ident("field") {
            return match &attr.meta {
                Meta::List(meta_list) => {
                    let mut operations = Vec::new();

                    if let Ok(field_ops) = meta_list.parse_args::<FieldOperations>() {
                        for ident in field_ops.operations {
                            match ident.to_string().as_str() {
                                "merge" => operations.push("merge".to_string()),
                                "nested" => operations.push("nested".to_string()),
                                _ => {} // Ignore unknown operations
                            }
                        }
                    }

                    Some(operations)
                }
                // #[field] without arguments - default to a scalar merge field
                Meta::Path(_) => Some(vec!["merge".to_string()]),
                // #[field = "value"] - not supported
                Meta::NameValue(_) => None,
            };
        }
    }

    None
}

/// Whether this field is declared `#[field(merge, nested)]`
pub fn is_nested_merge_field(attrs: &[Attribute]) -> bool {
    parse_field_operations(attrs)
        .map(|ops| ops.iter().any(|op| op == "merge") && ops.iter().any(|op| op == "nested"))
        .unwrap_or(false)
}

#[cfg(test)]
mod validation_tests {
    use super::*;

    fn validate_table_name(name: &str) {
        if let Err(e) = validate_table_name_syn(name, proc_macro2::Span::call_site()) {
            panic!("Invalid table name: {}", e);
        }
    }

    fn validate_field_name(name: &str) {
        if let Err(e) = validate_field_name_syn(name, proc_macro2::Span::call_site()) {
            panic!("Invalid field name: {}", e);
        }
    }

    #[test]
    fn test_valid_table_names() {
        validate_table_name("products");
        validate_table_name("product_variants");
        validate_table_name("_private");
        validate_table_name("table123");
        validate_table_name("a");
    }

    #[test]
    #[should_panic(expected = "Invalid table name")]
    fn test_reserved_keyword() {
        validate_table_name("SELECT");
    }

    #[test]
    #[should_panic(expected = "Invalid table name")]
    fn test_invalid_start() {
        validate_table_name("123table");
    }

    #[test]
    #[should_panic(expected = "Invalid table name")]
    fn test_invalid_chars() {
        validate_table_name("product-table");
    }

    #[test]
    #[should_panic(expected = "Invalid table name")]
    fn test_empty_name() {
        validate_table_name("");
    }

    #[test]
    fn test_field_validation() {
        validate_field_name("id");
        validate_field_name("handle");
        validate_field_name("field123");
    }

    #[test]
    #[should_panic(expected = "Invalid field name")]
    fn test_invalid_field() {
        validate_field_name("SELECT");
    }

    #[test]
    fn test_sql_injection_prevention() {
        let malicious_names = [
            "products; DROP TABLE products; --",
            "products' OR '1'='1",
            "products/**/UNION/**/SELECT",
            "products\"; DELETE FROM products; --",
        ];

        for name in malicious_names {
            let result = std::panic::catch_unwind(|| {
                validate_table_name(name);
            });
            assert!(result.is_err(), "Should panic for malicious name: {}", name);
        }
    }

    #[test]
    fn test_scalar_kind_mapping() {
        assert_eq!(ScalarKind::from_inner_type("String"), Some(ScalarKind::Text));
        assert_eq!(ScalarKind::from_inner_type("i32"), Some(ScalarKind::Integer));
        assert_eq!(ScalarKind::from_inner_type("f64"), Some(ScalarKind::Double));
        assert_eq!(
            ScalarKind::from_inner_type("chrono::DateTime<chrono::Utc>"),
            Some(ScalarKind::Timestamp)
        );
        assert_eq!(ScalarKind::from_inner_type("Vec<u8>"), None);
    }

    #[test]
    fn test_option_inner_type_extraction() {
        assert_eq!(option_inner_type("Option<String>"), Some("String"));
        assert_eq!(option_inner_type("Option<Dimensions>"), Some("Dimensions"));
        assert_eq!(option_inner_type("String"), None);
    }
}
