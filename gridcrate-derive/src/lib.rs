mod attribute_parser;
mod enums;
mod record;
mod type_utils;

use proc_macro::TokenStream;
use syn::{DeriveInput, parse_macro_input};

/// Derive `gridcrate::GridRecord`: a field registry built from the struct's fields.
///
/// Every named field is registered under its name, and its type must implement
/// `gridcrate::IntoFieldValue` (strings, numbers, booleans, chrono dates and times,
/// `Uuid`, `#[derive(GridEnum)]` enums, and `Option` of any of these).
///
/// # Attributes
///
/// On the struct:
/// - `#[grid(rename_all = "camelCase")]`: rename every field (`lowercase`,
///   `UPPERCASE`, `snake_case`, `SCREAMING_SNAKE_CASE`, `kebab-case`, `camelCase`,
///   `PascalCase`)
///
/// On a field:
/// - `#[grid(rename = "name")]`: register under another name
/// - `#[grid(skip)]`: leave the field out, e.g. collections
/// - `#[grid(nested)]`: flatten a `GridRecord` field (or `Option` of one) under
///   `field.`; a missing optional record reads every nested field as null
/// - `#[grid(enum_field)]`: register a field whose type implements `GridEnum` but
///   not `IntoFieldValue`
///
/// ```rust,ignore
/// #[derive(GridRecord)]
/// #[grid(rename_all = "camelCase")]
/// pub struct Ticket {
///     pub title: String,
///     pub created_at: DateTime<Utc>,
///     #[grid(nested)]
///     pub assignee: Option<User>,
///     #[grid(skip)]
///     pub attachments: Vec<Attachment>,
/// }
/// ```
#[proc_macro_derive(GridRecord, attributes(grid))]
pub fn derive_grid_record(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    record::expand(&input)
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}

/// Derive `gridcrate::GridEnum` and `gridcrate::IntoFieldValue` for a unit enum.
///
/// Variants are matched by name in filters and ordered by declaration. Names
/// follow `#[grid(rename_all = "...")]` on the enum and `#[grid(rename = "...")]`
/// on a variant.
///
/// ```rust,ignore
/// #[derive(GridEnum)]
/// pub enum Status {
///     Open,
///     #[grid(rename = "In Progress")]
///     InProgress,
///     Closed,
/// }
/// ```
#[proc_macro_derive(GridEnum, attributes(grid))]
pub fn derive_grid_enum(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    enums::expand(&input)
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}
