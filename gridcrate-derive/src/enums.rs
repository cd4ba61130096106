use proc_macro2::TokenStream;
use quote::quote;
use syn::{Data, DeriveInput, Fields};

use crate::attribute_parser;

pub(crate) fn expand(input: &DeriveInput) -> syn::Result<TokenStream> {
    let name = &input.ident;
    if !input.generics.params.is_empty() {
        return Err(syn::Error::new_spanned(
            &input.generics,
            "GridEnum cannot be derived for generic types",
        ));
    }
    let Data::Enum(data) = &input.data else {
        return Err(syn::Error::new_spanned(
            name,
            "GridEnum can only be derived for enums",
        ));
    };
    if data.variants.is_empty() {
        return Err(syn::Error::new_spanned(
            name,
            "GridEnum requires at least one variant",
        ));
    }

    let container = attribute_parser::parse_container_meta(&input.attrs)?;
    let mut names = Vec::with_capacity(data.variants.len());
    let mut idents = Vec::with_capacity(data.variants.len());
    for variant in &data.variants {
        if !matches!(variant.fields, Fields::Unit) {
            return Err(syn::Error::new_spanned(
                variant,
                "GridEnum only supports unit variants",
            ));
        }
        let meta = attribute_parser::parse_field_meta(&variant.attrs)?;
        names.push(attribute_parser::registered_name(
            &variant.ident.to_string(),
            &meta,
            &container,
        ));
        idents.push(&variant.ident);
    }
    let ordinals = 0..idents.len();

    Ok(quote! {
        impl ::gridcrate::GridEnum for #name {
            const VARIANTS: &'static [&'static str] = &[#(#names),*];

            fn variant_name(&self) -> &'static str {
                match self {
                    #(Self::#idents => #names,)*
                }
            }

            fn ordinal(&self) -> usize {
                match self {
                    #(Self::#idents => #ordinals,)*
                }
            }
        }

        impl ::gridcrate::IntoFieldValue for #name {
            const KIND: ::gridcrate::FieldKind =
                ::gridcrate::FieldKind::Enum(<Self as ::gridcrate::GridEnum>::VARIANTS);

            fn to_field_value(&self) -> ::gridcrate::FieldValue {
                ::gridcrate::GridEnum::field_value(self)
            }
        }
    })
}
