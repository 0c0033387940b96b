//! # objmap-derive
//!
//! `#[derive(Reflect)]` for structs, so they can be walked by the objmap mapper.

use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use syn::ext::IdentExt;
use syn::{
    parse_macro_input, parse_quote, Attribute, Data, DeriveInput, Field, GenericParam, Index,
    LitStr, Member, Path,
};

/// Derive macro for the `Reflect` and `Struct` traits.
///
/// Generates both impls for a struct with named fields, a tuple struct (fields
/// are named `"0"`, `"1"`, ...) or a unit struct. Every type parameter gets a
/// `Reflect` bound; lifetime parameters are rejected because reflected values
/// must be `'static`.
///
/// # Attributes
///
/// - `#[reflect(crate = "path")]` on the struct: path of the reflect crate,
///   `::objmap_reflect` by default. Use `"objmap::reflect"` when depending on
///   the `objmap` facade only.
/// - `#[reflect(skip)]` on a field: hide the field from introspection.
///
/// # Example
///
/// ```ignore
/// #[derive(Reflect, Default)]
/// pub struct User {
///     pub id: i64,
///     pub name: String,
///     #[reflect(skip)]
///     pub session: Option<SessionHandle>,
/// }
/// ```
#[proc_macro_derive(Reflect, attributes(reflect))]
pub fn derive_reflect(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    match derive_impl(&input) {
        Ok(tokens) => tokens.into(),
        Err(e) => e.to_compile_error().into(),
    }
}

fn derive_impl(input: &DeriveInput) -> Result<TokenStream2, syn::Error> {
    let name = &input.ident;
    let krate = crate_path(&input.attrs)?;

    if let Some(lifetime) = input.generics.lifetimes().next() {
        return Err(syn::Error::new_spanned(
            lifetime,
            "Reflect cannot be derived for types with lifetime parameters",
        ));
    }

    let fields = match &input.data {
        Data::Struct(data) => &data.fields,
        _ => {
            return Err(syn::Error::new_spanned(
                name,
                "Reflect can only be derived for structs",
            ))
        }
    };

    let mut field_names = Vec::new();
    let mut members = Vec::new();
    for (index, field) in fields.iter().enumerate() {
        if is_skipped(field)? {
            continue;
        }
        match &field.ident {
            Some(ident) => {
                field_names.push(ident.unraw().to_string());
                members.push(Member::Named(ident.clone()));
            }
            None => {
                field_names.push(index.to_string());
                members.push(Member::Unnamed(Index::from(index)));
            }
        }
    }
    let positions: Vec<usize> = (0..members.len()).collect();

    let mut generics = input.generics.clone();
    for param in &mut generics.params {
        if let GenericParam::Type(ty) = param {
            ty.bounds.push(parse_quote!(#krate::Reflect));
        }
    }
    let (impl_generics, ty_generics, where_clause) = generics.split_for_impl();

    let expanded = quote! {
        impl #impl_generics #krate::Reflect for #name #ty_generics #where_clause {
            fn static_category() -> #krate::Category {
                #krate::Category::Struct
            }

            fn as_any(&self) -> &dyn ::std::any::Any {
                self
            }

            fn as_any_mut(&mut self) -> &mut dyn ::std::any::Any {
                self
            }

            fn into_any(self: ::std::boxed::Box<Self>) -> ::std::boxed::Box<dyn ::std::any::Any> {
                self
            }

            fn as_reflect(&self) -> &dyn #krate::Reflect {
                self
            }

            fn as_reflect_mut(&mut self) -> &mut dyn #krate::Reflect {
                self
            }

            fn reflect_ref(&self) -> #krate::ReflectRef<'_> {
                #krate::ReflectRef::Struct(self)
            }

            fn reflect_mut(&mut self) -> #krate::ReflectMut<'_> {
                #krate::ReflectMut::Struct(self)
            }

            fn assign(
                &mut self,
                value: ::std::boxed::Box<dyn #krate::Reflect>,
            ) -> #krate::Result<()> {
                *self = value.take::<Self>()?;
                ::std::result::Result::Ok(())
            }
        }

        impl #impl_generics #krate::Struct for #name #ty_generics #where_clause {
            fn field_names(&self) -> &'static [&'static str] {
                &[#(#field_names),*]
            }

            #[allow(clippy::match_single_binding)]
            fn field_at(&self, index: usize) -> ::std::option::Option<&dyn #krate::Reflect> {
                match index {
                    #(#positions => ::std::option::Option::Some(&self.#members as &dyn #krate::Reflect),)*
                    _ => ::std::option::Option::None,
                }
            }

            #[allow(clippy::match_single_binding)]
            fn field_at_mut(
                &mut self,
                index: usize,
            ) -> ::std::option::Option<&mut dyn #krate::Reflect> {
                match index {
                    #(#positions => ::std::option::Option::Some(&mut self.#members as &mut dyn #krate::Reflect),)*
                    _ => ::std::option::Option::None,
                }
            }
        }
    };

    Ok(expanded)
}

/// Read `#[reflect(crate = "...")]`, defaulting to `::objmap_reflect`.
fn crate_path(attrs: &[Attribute]) -> Result<Path, syn::Error> {
    let mut path: Path = parse_quote!(::objmap_reflect);
    for attr in attrs {
        if !attr.path().is_ident("reflect") {
            continue;
        }
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("crate") {
                let value: LitStr = meta.value()?.parse()?;
                path = value.parse()?;
                Ok(())
            } else {
                Err(meta.error("unknown container attribute (expected `crate = \"...\"`)"))
            }
        })?;
    }
    Ok(path)
}

fn is_skipped(field: &Field) -> Result<bool, syn::Error> {
    let mut skip = false;
    for attr in &field.attrs {
        if !attr.path().is_ident("reflect") {
            continue;
        }
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("skip") {
                skip = true;
                Ok(())
            } else {
                Err(meta.error("unknown field attribute (expected `skip`)"))
            }
        })?;
    }
    Ok(skip)
}
