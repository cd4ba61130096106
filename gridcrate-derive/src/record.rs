use proc_macro2::TokenStream;
use quote::quote;
use syn::{Data, DeriveInput, Fields};

use crate::attribute_parser::{self, ContainerMeta};
use crate::type_utils::option_inner;

pub(crate) fn expand(input: &DeriveInput) -> syn::Result<TokenStream> {
    let name = &input.ident;
    if !input.generics.params.is_empty() {
        return Err(syn::Error::new_spanned(
            &input.generics,
            "GridRecord cannot be derived for generic types",
        ));
    }

    let Data::Struct(data) = &input.data else {
        return Err(syn::Error::new_spanned(
            name,
            "GridRecord can only be derived for structs",
        ));
    };
    let Fields::Named(named) = &data.fields else {
        return Err(syn::Error::new_spanned(
            name,
            "GridRecord only supports structs with named fields",
        ));
    };

    let container = attribute_parser::parse_container_meta(&input.attrs)?;
    let registrations = named
        .named
        .iter()
        .map(|field| registration(name, field, &container))
        .collect::<syn::Result<Vec<_>>>()?;

    Ok(quote! {
        impl ::gridcrate::GridRecord for #name {
            fn field_registry() -> &'static ::gridcrate::FieldRegistry<Self> {
                static REGISTRY: ::std::sync::OnceLock<::gridcrate::FieldRegistry<#name>> =
                    ::std::sync::OnceLock::new();
                REGISTRY.get_or_init(|| {
                    ::gridcrate::FieldRegistry::<#name>::builder()
                        #(#registrations)*
                        .build()
                })
            }
        }
    })
}

/// One builder call for `field`, or nothing when it is skipped.
fn registration(
    owner: &syn::Ident,
    field: &syn::Field,
    container: &ContainerMeta,
) -> syn::Result<TokenStream> {
    let meta = attribute_parser::parse_field_meta(&field.attrs)?;
    if meta.skip {
        return Ok(TokenStream::new());
    }

    let Some(ident) = &field.ident else {
        return Err(syn::Error::new_spanned(field, "expected a named field"));
    };
    let rust_name = ident.to_string();
    let rust_name = rust_name.strip_prefix("r#").unwrap_or(&rust_name);
    let path = attribute_parser::registered_name(rust_name, &meta, container);
    let inner = option_inner(&field.ty);

    let tokens = if meta.nested {
        match inner {
            Some(_) => quote! {
                .nested_optional(#path, |record: &#owner| record.#ident.as_ref())
            },
            None => quote! {
                .nested(#path, |record: &#owner| &record.#ident)
            },
        }
    } else if meta.enum_field {
        match inner {
            Some(enum_ty) => quote! {
                .computed(
                    #path,
                    ::gridcrate::FieldKind::Enum(<#enum_ty as ::gridcrate::GridEnum>::VARIANTS),
                    true,
                    |record: &#owner| record
                        .#ident
                        .as_ref()
                        .map_or(::gridcrate::FieldValue::Null, ::gridcrate::GridEnum::field_value),
                )
            },
            None => {
                let enum_ty = &field.ty;
                quote! {
                    .computed(
                        #path,
                        ::gridcrate::FieldKind::Enum(<#enum_ty as ::gridcrate::GridEnum>::VARIANTS),
                        false,
                        |record: &#owner| ::gridcrate::GridEnum::field_value(&record.#ident),
                    )
                }
            }
        }
    } else {
        quote! {
            .field(#path, |record: &#owner| &record.#ident)
        }
    };
    Ok(tokens)
}

#[cfg(test)]
mod tests {
    use super::*;
    use syn::parse_quote;

    fn expand_str(input: &DeriveInput) -> String {
        expand(input).unwrap().to_string()
    }

    #[test]
    fn test_plain_fields_register_by_reference() {
        let input: DeriveInput = parse_quote! {
            struct Ticket {
                title: String,
                #[grid(skip)]
                attachments: Vec<String>,
            }
        };
        let out = expand_str(&input);
        assert!(out.contains(". field (\"title\""), "{out}");
        assert!(!out.contains("attachments"), "{out}");
        assert!(out.contains("OnceLock"), "{out}");
    }

    #[test]
    fn test_nested_option_uses_nested_optional() {
        let input: DeriveInput = parse_quote! {
            struct Ticket {
                #[grid(nested)]
                assignee: Option<User>,
                #[grid(nested)]
                project: Project,
            }
        };
        let out = expand_str(&input);
        assert!(out.contains(". nested_optional (\"assignee\""), "{out}");
        assert!(out.contains(". nested (\"project\""), "{out}");
    }

    #[test]
    fn test_enum_field_uses_grid_enum() {
        let input: DeriveInput = parse_quote! {
            #[grid(rename_all = "camelCase")]
            struct Ticket {
                #[grid(enum_field)]
                current_status: Option<Status>,
            }
        };
        let out = expand_str(&input);
        assert!(out.contains("\"currentStatus\""), "{out}");
        assert!(out.contains("< Status as :: gridcrate :: GridEnum > :: VARIANTS"), "{out}");
    }

    #[test]
    fn test_raw_identifiers_drop_prefix() {
        let input: DeriveInput = parse_quote! {
            struct Ticket { r#type: String }
        };
        assert!(expand_str(&input).contains("\"type\""));
    }

    #[test]
    fn test_generic_struct_is_rejected() {
        let input: DeriveInput = parse_quote! {
            struct Wrapper<T> { inner: T }
        };
        assert!(expand(&input).is_err());
    }

    #[test]
    fn test_tuple_struct_is_rejected() {
        let input: DeriveInput = parse_quote! {
            struct Pair(String, i32);
        };
        assert!(expand(&input).is_err());
    }
}
