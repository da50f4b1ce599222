//! Attribute macros that turn plain structs into store-ready entities
//!
//! `#[entity]` and `#[embedded]` inject the full derive set a struct needs to
//! flow through the store (serde, sqlx row mapping, the merge schema) so call
//! sites only declare fields and the table/key attributes.

use proc_macro2::TokenStream;
use quote::quote;
use syn::{parse_quote, Fields, ItemStruct};

use crate::parsing::{has_attribute, is_nested_merge_field, option_inner_type};

/// Expand `#[entity]` on a struct definition
///
/// Adds the derives required by `HandleStore`, and marks every nested merge
/// field as a nullable JSONB column for sqlx row decoding.
pub fn expand_entity(mut item: ItemStruct) -> syn::Result<TokenStream> {
    annotate_nested_fields(&mut item)?;

    item.attrs.insert(
        0,
        parse_quote!(#[derive(
            Debug,
            Clone,
            PartialEq,
            serde::Serialize,
            serde::Deserialize,
            sqlx::FromRow,
            merge_derive::Entity
        )]),
    );

    Ok(quote! { #item })
}

/// Expand `#[embedded]` on a value-object struct
///
/// Embedded objects never map to their own table; they live inside a parent
/// row as JSONB and only need serde plus the merge schema.
pub fn expand_embedded(mut item: ItemStruct) -> syn::Result<TokenStream> {
    item.attrs.insert(
        0,
        parse_quote!(#[derive(
            Debug,
            Clone,
            PartialEq,
            serde::Serialize,
            serde::Deserialize,
            merge_derive::Mergeable
        )]),
    );

    Ok(quote! { #item })
}

/// Attach `#[sqlx(json(nullable))]` to every `#[field(merge, nested)]` member
fn annotate_nested_fields(item: &mut ItemStruct) -> syn::Result<()> {
    let Fields::Named(fields) = &mut item.fields else {
        return Err(syn::Error::new_spanned(
            &item.ident,
            "#[entity] requires a struct with named fields",
        ));
    };

    for field in fields.named.iter_mut() {
        if !is_nested_merge_field(&field.attrs) {
            continue;
        }
        let ty = &field.ty;
        let normalized = quote!(#ty).to_string().replace(' ', "");
        if option_inner_type(&normalized).is_none() {
            return Err(syn::Error::new_spanned(
                &field.ty,
                "nested merge fields must be Option<T>",
            ));
        }
        if !has_attribute(&field.attrs, "sqlx") {
            field.attrs.push(parse_quote!(#[sqlx(json(nullable))]));
        }
    }

    Ok(())
}
