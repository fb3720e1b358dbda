//! Derive macro implementation for envbind

use proc_macro::TokenStream;
use quote::quote;
use syn::ext::IdentExt;
use syn::{parse_macro_input, parse_quote, Data, DeriveInput, Fields};

mod attrs;

use attrs::FieldAttrs;

/// `EnvBind` derive macro
///
/// Implements `envbind::Record` and `envbind::Field` for a struct with named
/// fields, producing a descriptor table of its bindable fields in
/// declaration order.
///
/// # Supported Attributes
///
/// **Field-level**:
/// - `#[env(name = "VAR")]`: Bind the field from environment variable `VAR`
/// - `#[env(skip)]`: Leave the field out of binding
///
/// Fields without `pub` visibility are always left out. Every other field's
/// type must implement `envbind::Field`.
///
/// # Example
///
/// See the `envbind` crate documentation for usage examples.
#[proc_macro_derive(EnvBind, attributes(env))]
pub fn derive_envbind(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);

    expand(input)
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}

fn expand(mut input: DeriveInput) -> syn::Result<proc_macro2::TokenStream> {
    // Extract fields
    let fields = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(fields) => &fields.named,
            _ => {
                return Err(syn::Error::new_spanned(
                    &input.ident,
                    "EnvBind only supports structs with named fields",
                ));
            }
        },
        _ => {
            return Err(syn::Error::new_spanned(
                &input.ident,
                "EnvBind only supports structs",
            ));
        }
    };

    // Generate one descriptor per bindable field
    let mut slots = Vec::new();
    for field in fields {
        let attrs = FieldAttrs::from_field(field)?;
        if !attrs.is_bound(field) {
            continue;
        }

        let Some(field_name) = field.ident.as_ref() else {
            continue;
        };
        let name = field_name.unraw().to_string();
        let variable = match attrs.name {
            Some(variable) => quote! { ::std::option::Option::Some(#variable) },
            None => quote! { ::std::option::Option::None },
        };

        slots.push(quote! {
            ::envbind::FieldSlot::new(#name, #variable, &mut self.#field_name)
        });
    }

    // Every type parameter must itself be bindable
    let type_params: Vec<_> = input
        .generics
        .type_params()
        .map(|param| param.ident.clone())
        .collect();
    let where_clause = input.generics.make_where_clause();
    for ident in type_params {
        where_clause
            .predicates
            .push(parse_quote! { #ident: ::envbind::Field });
    }

    let struct_name = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    Ok(quote! {
        impl #impl_generics ::envbind::Record for #struct_name #ty_generics #where_clause {
            fn fields(&mut self) -> ::std::vec::Vec<::envbind::FieldSlot<'_>> {
                ::std::vec![#(#slots),*]
            }
        }

        impl #impl_generics ::envbind::Field for #struct_name #ty_generics #where_clause {
            fn kind() -> ::envbind::Kind {
                ::envbind::Kind::Record
            }

            fn target(&mut self) -> ::envbind::Target<'_> {
                ::envbind::Target::Record(self)
            }
        }
    })
}
