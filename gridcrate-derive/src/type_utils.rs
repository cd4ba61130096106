//! Type introspection helpers for field analysis.

/// If `ty` is `Option<T>` (including `std::option::Option<T>`), returns `T`.
pub(crate) fn option_inner(ty: &syn::Type) -> Option<&syn::Type> {
    let syn::Type::Path(type_path) = ty else {
        return None;
    };
    let last_seg = type_path.path.segments.last()?;
    if last_seg.ident != "Option" {
        return None;
    }
    let syn::PathArguments::AngleBracketed(args) = &last_seg.arguments else {
        return None;
    };
    match args.args.first()? {
        syn::GenericArgument::Type(inner) => Some(inner),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quote::quote;
    use syn::parse_quote;

    #[test]
    fn test_option_inner_with_std_option() {
        let ty: syn::Type = parse_quote! { std::option::Option<i32> };
        assert!(option_inner(&ty).is_some());
    }

    #[test]
    fn test_option_inner_with_non_option_type() {
        let ty: syn::Type = parse_quote! { String };
        assert!(option_inner(&ty).is_none());
        let ty: syn::Type = parse_quote! { Vec<Option<String>> };
        assert!(option_inner(&ty).is_none());
    }

    #[test]
    fn test_option_inner() {
        let ty: syn::Type = parse_quote! { Option<Address> };
        let inner = option_inner(&ty).unwrap();
        assert_eq!(quote!(#inner).to_string(), "Address");
    }
}
