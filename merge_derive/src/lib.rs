//! Procedural macros for handle-addressed entities and their merge schemas
//!
//! This crate provides the `#[entity]` and `#[embedded]` attribute macros plus
//! the `Entity` and `Mergeable` derives that generate table metadata, query
//! execution and the static field-copy schema for struct types.

use proc_macro::TokenStream;
use syn::{parse_macro_input, DeriveInput, ItemStruct};

mod codegen;
mod entity_macro;
mod parsing;

use codegen::{generate_entity_metadata_impl, generate_executor_impl, generate_mergeable_impl};
use entity_macro::{expand_embedded, expand_entity};
use parsing::{parse_entity_fields, parse_merge_fields, parse_table_attributes};

/// Derive macro for handle-addressed entities
///
/// Note: It's recommended to use the `#[entity]` attribute macro instead,
/// which automatically includes this derive along with other necessary derives.
///
/// Manual usage (not recommended):
/// ```rust,ignore
/// #[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize, sqlx::FromRow, Entity)]
/// #[table(name = "products")]
/// pub struct Product {
///     #[primary_key]
///     pub id: Uuid,
///
///     #[handle]
///     pub handle: String,
///
///     #[field(merge)]
///     pub title: Option<String>,
/// }
/// ```
///
/// Recommended usage:
/// ```rust,ignore
/// use merge_derive::entity;
///
/// #[entity]
/// #[table(name = "products")]
/// pub struct Product {
///     #[primary_key]
///     pub id: Uuid,
///
///     #[handle]
///     pub handle: String,
///
///     #[field(merge)]
///     pub title: Option<String>,
///
///     #[field(merge, nested)]
///     pub dimensions: Option<Dimensions>,
/// }
/// ```
#[proc_macro_derive(Entity, attributes(table, primary_key, handle, field, sqlx))]
pub fn derive_entity(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);

    let name = &input.ident;

    let table_info = match parse_table_attributes(&input.attrs) {
        Ok(attrs) => attrs,
        Err(e) => return e.to_compile_error().into(),
    };

    let field_info = match parse_entity_fields(&input.data) {
        Ok(info) => info,
        Err(e) => return e.to_compile_error().into(),
    };

    let metadata_impl = generate_entity_metadata_impl(name, &table_info, &field_info);
    let executor_impl = generate_executor_impl(name, &field_info);
    let mergeable_impl = generate_mergeable_impl(name, &field_info.merge_fields);

    let expanded = quote::quote! {
        #metadata_impl
        #executor_impl
        #mergeable_impl
    };

    TokenStream::from(expanded)
}

/// Derive macro for the merge schema alone
///
/// Used for embedded value objects that live inside a parent row and carry no
/// table of their own. Prefer the `#[embedded]` attribute macro.
#[proc_macro_derive(Mergeable, attributes(field))]
pub fn derive_mergeable(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);

    let name = &input.ident;

    let merge_fields = match parse_merge_fields(&input.data, |_, _, _| Ok(())) {
        Ok(fields) => fields,
        Err(e) => return e.to_compile_error().into(),
    };

    let mergeable_impl = generate_mergeable_impl(name, &merge_fields);

    TokenStream::from(mergeable_impl)
}

/// Convenience attribute macro that adds all necessary derives for a
/// handle-addressed entity
///
/// Usage:
/// ```rust,ignore
/// use merge_derive::entity;
///
/// #[entity]
/// #[table(name = "products")]
/// pub struct Product {
///     #[primary_key]
///     pub id: Uuid,
///     #[handle]
///     pub handle: String,
///     #[field(merge)]
///     pub title: Option<String>,
/// }
/// ```
#[proc_macro_attribute]
pub fn entity(_attr: TokenStream, item: TokenStream) -> TokenStream {
    let item = parse_macro_input!(item as ItemStruct);
    match expand_entity(item) {
        Ok(expanded) => expanded.into(),
        Err(e) => e.to_compile_error().into(),
    }
}

/// Attribute macro for embedded value objects carried as JSONB inside a
/// parent entity's row
///
/// Usage:
/// ```rust,ignore
/// use merge_derive::embedded;
///
/// #[embedded]
/// pub struct Dimensions {
///     #[field(merge)]
///     pub width_mm: Option<i32>,
///     #[field(merge)]
///     pub height_mm: Option<i32>,
/// }
/// ```
#[proc_macro_attribute]
pub fn embedded(_attr: TokenStream, item: TokenStream) -> TokenStream {
    let item = parse_macro_input!(item as ItemStruct);
    match expand_embedded(item) {
        Ok(expanded) => expanded.into(),
        Err(e) => e.to_compile_error().into(),
    }
}
