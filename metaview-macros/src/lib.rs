//! Procedural macros for the metaview introspection engine.
//!
//! - `#[derive(Literal)]`: Implements `metaview::Literal` for a fieldless enum,
//!   naming the enumeration after the type and each literal after its variant.
//!   `#[literal(enumeration = "...")]` on the type and `#[literal(name = "...")]`
//!   on a variant override the defaults.
//!
//! Usage:
//! ```rust,ignore
//! use metaview::Literal;
//!
//! #[derive(Literal)]
//! #[literal(enumeration = "uml.VisibilityMode")]
//! enum Visibility {
//!     Public,
//!     #[literal(name = "PACKAGE")]
//!     Package,
//! }
//! ```
use proc_macro::TokenStream;
use quote::quote;
use syn::{Attribute, Data, DeriveInput, Fields, LitStr, parse_macro_input};

#[proc_macro_derive(Literal, attributes(literal))]
pub fn derive_literal(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    match expand_literal(&input) {
        Ok(tokens) => tokens.into(),
        Err(e) => e.to_compile_error().into(),
    }
}

fn expand_literal(input: &DeriveInput) -> syn::Result<proc_macro2::TokenStream> {
    let ident = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    let Data::Enum(data_enum) = &input.data else {
        return Err(syn::Error::new_spanned(
            ident,
            "Literal can only be derived for enums",
        ));
    };

    let enumeration = literal_override(&input.attrs, "enumeration")?
        .unwrap_or_else(|| ident.to_string());

    let mut match_arms = Vec::with_capacity(data_enum.variants.len());
    for variant in &data_enum.variants {
        if !matches!(variant.fields, Fields::Unit) {
            return Err(syn::Error::new_spanned(
                variant,
                "Literal variants cannot carry fields",
            ));
        }
        let variant_ident = &variant.ident;
        let literal_name =
            literal_override(&variant.attrs, "name")?.unwrap_or_else(|| variant_ident.to_string());
        match_arms.push(quote! {
            Self::#variant_ident => ::std::borrow::Cow::Borrowed(#literal_name)
        });
    }

    Ok(quote! {
        impl #impl_generics metaview::Literal for #ident #ty_generics #where_clause {
            fn enumeration(&self) -> ::std::borrow::Cow<'static, str> {
                ::std::borrow::Cow::Borrowed(#enumeration)
            }

            fn literal(&self) -> ::std::borrow::Cow<'static, str> {
                match *self {
                    #(#match_arms),*
                }
            }
        }
    })
}

/// Reads `#[literal(<key> = "...")]` from a list of attributes.
fn literal_override(attrs: &[Attribute], key: &str) -> syn::Result<Option<String>> {
    let mut found = None;
    for attr in attrs.iter().filter(|a| a.path().is_ident("literal")) {
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident(key) {
                let value: LitStr = meta.value()?.parse()?;
                found = Some(value.value());
                Ok(())
            } else {
                Err(meta.error(format!("expected `{key}`")))
            }
        })?;
    }
    Ok(found)
}
