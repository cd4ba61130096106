use heck::{
    ToKebabCase, ToLowerCamelCase, ToShoutySnakeCase, ToSnakeCase, ToUpperCamelCase,
};
use syn::parse::Parser;
use syn::{Lit, Meta, punctuated::Punctuated, token::Comma};

/// `#[grid(rename_all = "...")]` on a struct or enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum RenameRule {
    Lower,
    Upper,
    Snake,
    ScreamingSnake,
    Kebab,
    Camel,
    Pascal,
}

impl RenameRule {
    fn parse(value: &str) -> Option<Self> {
        match value {
            "lowercase" => Some(Self::Lower),
            "UPPERCASE" => Some(Self::Upper),
            "snake_case" => Some(Self::Snake),
            "SCREAMING_SNAKE_CASE" => Some(Self::ScreamingSnake),
            "kebab-case" => Some(Self::Kebab),
            "camelCase" => Some(Self::Camel),
            "PascalCase" => Some(Self::Pascal),
            _ => None,
        }
    }

    pub(crate) fn apply(self, name: &str) -> String {
        match self {
            Self::Lower => name.to_lowercase(),
            Self::Upper => name.to_uppercase(),
            Self::Snake => name.to_snake_case(),
            Self::ScreamingSnake => name.to_shouty_snake_case(),
            Self::Kebab => name.to_kebab_case(),
            Self::Camel => name.to_lower_camel_case(),
            Self::Pascal => name.to_upper_camel_case(),
        }
    }
}

/// Container-level `#[grid(...)]` options.
#[derive(Debug, Default)]
pub(crate) struct ContainerMeta {
    pub rename_all: Option<RenameRule>,
}

/// Field- or variant-level `#[grid(...)]` options.
#[derive(Debug, Default)]
pub(crate) struct FieldMeta {
    pub rename: Option<String>,
    pub skip: bool,
    pub nested: bool,
    pub enum_field: bool,
}

/// Every `#[grid(...)]` item on `attrs`, in order.
fn grid_metas(attrs: &[syn::Attribute]) -> syn::Result<Vec<Meta>> {
    let mut out = Vec::new();
    for attr in attrs {
        if attr.path().is_ident("grid") {
            let Meta::List(meta_list) = &attr.meta else {
                return Err(syn::Error::new_spanned(attr, "expected #[grid(...)]"));
            };
            let metas =
                Punctuated::<Meta, Comma>::parse_terminated.parse2(meta_list.tokens.clone())?;
            out.extend(metas);
        }
    }
    Ok(out)
}

fn string_value(meta: &syn::MetaNameValue) -> syn::Result<String> {
    if let syn::Expr::Lit(expr_lit) = &meta.value
        && let Lit::Str(s) = &expr_lit.lit
    {
        return Ok(s.value());
    }
    Err(syn::Error::new_spanned(&meta.value, "expected a string literal"))
}

/// Parses container metadata from `#[grid(...)]` on a struct or enum.
pub(crate) fn parse_container_meta(attrs: &[syn::Attribute]) -> syn::Result<ContainerMeta> {
    let mut meta = ContainerMeta::default();
    for item in grid_metas(attrs)? {
        match item {
            Meta::NameValue(nv) if nv.path.is_ident("rename_all") => {
                let value = string_value(&nv)?;
                meta.rename_all = Some(RenameRule::parse(&value).ok_or_else(|| {
                    syn::Error::new_spanned(
                        &nv.value,
                        format!("unknown rename_all rule `{value}`"),
                    )
                })?);
            }
            other => {
                return Err(syn::Error::new_spanned(
                    other,
                    "unknown grid container attribute, expected `rename_all`",
                ));
            }
        }
    }
    Ok(meta)
}

/// Parses `#[grid(rename = "...", skip, nested, enum_field)]` on a field or variant.
pub(crate) fn parse_field_meta(attrs: &[syn::Attribute]) -> syn::Result<FieldMeta> {
    let mut meta = FieldMeta::default();
    for item in grid_metas(attrs)? {
        match item {
            Meta::NameValue(nv) if nv.path.is_ident("rename") => {
                meta.rename = Some(string_value(&nv)?);
            }
            Meta::Path(path) if path.is_ident("skip") => meta.skip = true,
            Meta::Path(path) if path.is_ident("nested") => meta.nested = true,
            Meta::Path(path) if path.is_ident("enum_field") => meta.enum_field = true,
            other => {
                return Err(syn::Error::new_spanned(
                    other,
                    "unknown grid attribute, expected one of `rename`, `skip`, `nested`, `enum_field`",
                ));
            }
        }
    }
    if meta.nested && meta.enum_field {
        return Err(syn::Error::new(
            proc_macro2::Span::call_site(),
            "`nested` and `enum_field` cannot be combined",
        ));
    }
    Ok(meta)
}

/// The registered name: explicit rename, else the container rule, else the Rust name.
pub(crate) fn registered_name(
    rust_name: &str,
    field: &FieldMeta,
    container: &ContainerMeta,
) -> String {
    field.rename.clone().unwrap_or_else(|| {
        container
            .rename_all
            .map_or_else(|| rust_name.to_string(), |rule| rule.apply(rust_name))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use syn::parse_quote;

    fn field_attrs(field: &syn::Field) -> syn::Result<FieldMeta> {
        parse_field_meta(&field.attrs)
    }

    #[test]
    fn test_field_flags() {
        let field: syn::Field = parse_quote! {
            #[grid(nested, rename = "owner")]
            pub assignee: Option<User>
        };
        let meta = field_attrs(&field).unwrap();
        assert!(meta.nested);
        assert!(!meta.skip);
        assert_eq!(meta.rename.as_deref(), Some("owner"));
    }

    #[test]
    fn test_other_attributes_are_ignored() {
        let field: syn::Field = parse_quote! {
            #[sea_orm(primary_key)]
            #[serde(rename = "ID")]
            pub id: i32
        };
        let meta = field_attrs(&field).unwrap();
        assert!(meta.rename.is_none());
    }

    #[test]
    fn test_unknown_field_attribute_is_an_error() {
        let field: syn::Field = parse_quote! {
            #[grid(sortable)]
            pub id: i32
        };
        assert!(field_attrs(&field).is_err());
    }

    #[test]
    fn test_rename_all_rules() {
        let input: syn::DeriveInput = parse_quote! {
            #[grid(rename_all = "camelCase")]
            struct Ticket { created_at: i64 }
        };
        let container = parse_container_meta(&input.attrs).unwrap();
        let field = FieldMeta::default();
        assert_eq!(registered_name("created_at", &field, &container), "createdAt");

        let renamed = FieldMeta {
            rename: Some("opened".into()),
            ..FieldMeta::default()
        };
        assert_eq!(registered_name("created_at", &renamed, &container), "opened");
    }

    #[test]
    fn test_unknown_rename_rule_is_an_error() {
        let input: syn::DeriveInput = parse_quote! {
            #[grid(rename_all = "Title Case")]
            struct Ticket { id: i64 }
        };
        assert!(parse_container_meta(&input.attrs).is_err());
    }

    #[test]
    fn test_rename_rule_apply() {
        assert_eq!(RenameRule::Snake.apply("InProgress"), "in_progress");
        assert_eq!(RenameRule::ScreamingSnake.apply("InProgress"), "IN_PROGRESS");
        assert_eq!(RenameRule::Kebab.apply("created_at"), "created-at");
        assert_eq!(RenameRule::Pascal.apply("created_at"), "CreatedAt");
        assert_eq!(RenameRule::Lower.apply("InProgress"), "inprogress");
    }
}
