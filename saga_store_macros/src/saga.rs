use proc_macro::TokenStream;
use proc_macro2::Span;
use quote::quote;
use syn::{Data, DeriveInput, Field, Fields, Ident, LitStr};

#[derive(Default)]
struct FieldOptions {
    id: bool,
    revision: bool,
    skip: bool,
    rename: Option<String>,
}

pub fn derive_saga(input: TokenStream) -> TokenStream {
    let input = syn::parse_macro_input!(input as DeriveInput);
    match expand(&input) {
        Ok(tokens) => TokenStream::from(tokens),
        Err(err) => TokenStream::from(err.to_compile_error()),
    }
}

fn expand(input: &DeriveInput) -> syn::Result<proc_macro2::TokenStream> {
    let name = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    let saga_type = extract_saga_type(input)?;
    let fields = named_fields(input)?;

    let mut id_field = None;
    let mut revision_field = None;
    let mut property_names = Vec::new();
    let mut property_idents = Vec::new();

    for field in &fields {
        let ident = field
            .ident
            .clone()
            .ok_or_else(|| syn::Error::new_spanned(field, "Saga derive: unnamed field"))?;
        let options = field_options(field)?;

        if options.id {
            id_field = Some(ident.clone());
        }
        if options.revision {
            revision_field = Some(ident.clone());
        }
        if options.skip {
            continue;
        }

        let property = options.rename.unwrap_or_else(|| ident.to_string());
        property_names.push(LitStr::new(&property, Span::call_site()));
        property_idents.push(ident);
    }

    let id_field = match id_field {
        Some(ident) => ident,
        None => default_field(&fields, "id").ok_or_else(|| {
            syn::Error::new_spanned(
                name,
                "Saga derive: no field marked with #[saga(id)] and no field named `id`",
            )
        })?,
    };
    let revision_field = match revision_field {
        Some(ident) => ident,
        None => default_field(&fields, "revision").ok_or_else(|| {
            syn::Error::new_spanned(
                name,
                "Saga derive: no field marked with #[saga(revision)] and no field named `revision`",
            )
        })?,
    };

    Ok(quote! {
        impl #impl_generics ::saga_store::SagaData for #name #ty_generics #where_clause {
            const SAGA_TYPE: &'static str = #saga_type;

            fn id(&self) -> ::saga_store::SagaId {
                self.#id_field
            }

            fn set_id(&mut self, id: ::saga_store::SagaId) {
                self.#id_field = id;
            }

            fn revision(&self) -> u64 {
                self.#revision_field
            }

            fn set_revision(&mut self, revision: u64) {
                self.#revision_field = revision;
            }
        }

        impl #impl_generics ::saga_store::PropertyReader for #name #ty_generics #where_clause {
            fn read_property(&self, name: &str) -> ::core::option::Option<::saga_store::PropertyValue> {
                match name {
                    #(
                        #property_names => ::core::option::Option::Some(
                            ::saga_store::PropertyValue::from(
                                ::core::clone::Clone::clone(&self.#property_idents),
                            ),
                        ),
                    )*
                    _ => ::core::option::Option::None,
                }
            }
        }
    })
}

fn named_fields(input: &DeriveInput) -> syn::Result<Vec<&Field>> {
    if let Data::Struct(data_struct) = &input.data {
        if let Fields::Named(fields) = &data_struct.fields {
            return Ok(fields.named.iter().collect());
        }
    }
    Err(syn::Error::new_spanned(
        &input.ident,
        "Saga derive: only structs with named fields are supported",
    ))
}

fn extract_saga_type(input: &DeriveInput) -> syn::Result<String> {
    for attr in &input.attrs {
        if !attr.path().is_ident("saga") {
            continue;
        }

        let mut saga_type = None;
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("name") {
                let value: LitStr = meta.value()?.parse()?;
                saga_type = Some(value.value());
                Ok(())
            } else {
                Err(meta.error("unsupported saga container attribute"))
            }
        })?;

        if let Some(name) = saga_type {
            return Ok(name);
        }
    }

    Ok(to_snake_case(&input.ident.to_string()))
}

fn field_options(field: &Field) -> syn::Result<FieldOptions> {
    let mut options = FieldOptions::default();
    for attr in &field.attrs {
        if !attr.path().is_ident("saga") {
            continue;
        }
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("id") {
                options.id = true;
            } else if meta.path.is_ident("revision") {
                options.revision = true;
            } else if meta.path.is_ident("skip") {
                options.skip = true;
            } else if meta.path.is_ident("rename") {
                let value: LitStr = meta.value()?.parse()?;
                options.rename = Some(value.value());
            } else {
                return Err(meta.error("unsupported saga field attribute"));
            }
            Ok(())
        })?;
    }
    Ok(options)
}

fn default_field(fields: &[&Field], wanted: &str) -> Option<Ident> {
    fields
        .iter()
        .filter_map(|field| field.ident.as_ref())
        .find(|ident| *ident == wanted)
        .cloned()
}

fn to_snake_case(s: &str) -> String {
    let mut result = String::new();
    for (i, ch) in s.chars().enumerate() {
        if ch.is_uppercase() {
            if i > 0 {
                result.push('_');
            }
            result.extend(ch.to_lowercase());
        } else {
            result.push(ch);
        }
    }
    result
}
