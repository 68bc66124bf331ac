//! Procedural macros for turbo-response

#![forbid(unsafe_code)]
#![deny(clippy::all, clippy::pedantic, clippy::nursery)]
#![warn(clippy::cargo)]

use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use syn::{
    parse_macro_input, Data, DeriveInput, Error, Field, Fields, GenericArgument, LitStr,
    PathArguments, Type, TypePath,
};

/// Derive `turbo_response::Model`
///
/// Exactly one field must be marked `#[model(pk)]` and have type `Option<K>`;
/// `K` becomes the key type. The model name defaults to the lower-cased
/// struct name and can be set with `#[model(name = "...")]` on the struct.
///
/// ```rust,ignore
/// #[derive(Clone, Serialize, Model)]
/// #[model(name = "task")]
/// struct TodoItem {
///     #[model(pk)]
///     id: Option<i64>,
///     description: String,
/// }
/// ```
#[proc_macro_derive(Model, attributes(model))]
pub fn derive_model(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    expand_model(&input)
        .unwrap_or_else(Error::into_compile_error)
        .into()
}

fn expand_model(input: &DeriveInput) -> syn::Result<TokenStream2> {
    let ident = &input.ident;
    let name = model_name(input)?;
    let pk = pk_field(input)?;

    let Some(pk_ident) = &pk.ident else {
        return Err(Error::new_spanned(pk, "#[model(pk)] field must be named"));
    };
    let key_ty = option_inner(&pk.ty)
        .ok_or_else(|| Error::new_spanned(&pk.ty, "#[model(pk)] field must be Option<K>"))?;

    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    Ok(quote! {
        impl #impl_generics ::turbo_response::Model for #ident #ty_generics #where_clause {
            type Key = #key_ty;

            const NAME: &'static str = #name;

            fn pk(&self) -> ::core::option::Option<Self::Key> {
                ::core::clone::Clone::clone(&self.#pk_ident)
            }

            fn set_pk(&mut self, key: Self::Key) {
                self.#pk_ident = ::core::option::Option::Some(key);
            }
        }
    })
}

fn model_name(input: &DeriveInput) -> syn::Result<String> {
    let mut name = None;
    for attr in &input.attrs {
        if !attr.path().is_ident("model") {
            continue;
        }
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("name") {
                let value: LitStr = meta.value()?.parse()?;
                name = Some(value.value());
                Ok(())
            } else {
                Err(meta.error("expected `name = \"...\"`"))
            }
        })?;
    }
    Ok(name.unwrap_or_else(|| input.ident.to_string().to_lowercase()))
}

fn pk_field(input: &DeriveInput) -> syn::Result<&Field> {
    let Data::Struct(data) = &input.data else {
        return Err(Error::new_spanned(
            &input.ident,
            "Model can only be derived for structs",
        ));
    };
    let Fields::Named(fields) = &data.fields else {
        return Err(Error::new_spanned(
            &input.ident,
            "Model requires a struct with named fields",
        ));
    };

    let mut pk = None;
    for field in &fields.named {
        let mut marked = false;
        for attr in field.attrs.iter().filter(|a| a.path().is_ident("model")) {
            attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("pk") {
                    marked = true;
                    Ok(())
                } else {
                    Err(meta.error("expected `pk`"))
                }
            })?;
        }
        if marked && pk.replace(field).is_some() {
            return Err(Error::new_spanned(field, "only one field can be #[model(pk)]"));
        }
    }
    pk.ok_or_else(|| {
        Error::new_spanned(&input.ident, "Model requires a field marked #[model(pk)]")
    })
}

/// `K` out of `Option<K>`
fn option_inner(ty: &Type) -> Option<&Type> {
    let Type::Path(TypePath { qself: None, path }) = ty else {
        return None;
    };
    let segment = path.segments.last()?;
    if segment.ident != "Option" {
        return None;
    }
    let PathArguments::AngleBracketed(args) = &segment.arguments else {
        return None;
    };
    match (args.args.len(), args.args.first()?) {
        (1, GenericArgument::Type(inner)) => Some(inner),
        _ => None,
    }
}
