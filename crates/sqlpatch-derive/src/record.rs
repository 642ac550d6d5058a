//! Record derive macro implementation
//!
//! Emits a static descriptor table, index-based field access, an in-place
//! merge (`load_fields`), and a `PatchField` impl so the record can be a field
//! of another record.

mod attrs;

use attrs::{get_field_attrs, get_struct_attrs};
use proc_macro2::TokenStream;
use quote::quote;
use syn::{Data, DeriveInput, Fields, Result};

struct FieldInfo<'a> {
    ident: &'a syn::Ident,
    ty: &'a syn::Type,
    tags: Vec<(String, String)>,
    embedded: bool,
    visible: bool,
    /// Private or skipped: never read, so its type needs no `PatchField` impl.
    excluded: bool,
}

pub fn expand(input: DeriveInput) -> Result<TokenStream> {
    let name = &input.ident;

    if !input.generics.params.is_empty() {
        return Err(syn::Error::new_spanned(
            &input.generics,
            "Record cannot be derived for generic structs",
        ));
    }

    let fields = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(fields) => &fields.named,
            _ => {
                return Err(syn::Error::new_spanned(
                    &input,
                    "Record can only be derived for structs with named fields",
                ));
            }
        },
        _ => {
            return Err(syn::Error::new_spanned(
                &input,
                "Record can only be derived for structs",
            ));
        }
    };

    let struct_attrs = get_struct_attrs(&input)?;

    let mut infos = Vec::with_capacity(fields.len());
    for field in fields {
        let attrs = get_field_attrs(field)?;
        let Some(ident) = field.ident.as_ref() else {
            return Err(syn::Error::new_spanned(field, "expected a named field"));
        };
        let visible = matches!(field.vis, syn::Visibility::Public(_));
        infos.push(FieldInfo {
            ident,
            ty: &field.ty,
            excluded: !visible || attrs.is_skipped(),
            tags: attrs.resolved_tags(),
            embedded: attrs.embedded,
            visible,
        });
    }

    let name_str = name.to_string();
    let table = match &struct_attrs.table {
        Some(table) => quote! { ::core::option::Option::Some(#table) },
        None => quote! { ::core::option::Option::None },
    };

    let descriptors = infos.iter().map(|info| {
        let field_name = info.ident.to_string();
        let ty = info.ty;
        let embedded = info.embedded;
        let visible = info.visible;
        let tags = info.tags.iter().map(|(key, raw)| quote! { (#key, #raw) });
        let kind = if info.excluded {
            quote! { ::sqlpatch::FieldKind::NonStorable }
        } else {
            quote! { <#ty as ::sqlpatch::PatchField>::KIND }
        };
        quote! {
            ::sqlpatch::FieldDescriptor {
                name: #field_name,
                tags: &[#(#tags),*],
                kind: #kind,
                embedded: #embedded,
                visible: #visible,
            }
        }
    });

    let embed_checks = infos.iter().filter(|info| info.embedded && !info.excluded).map(|info| {
        let ty = info.ty;
        let message = format!("`{}`: `embed` requires a record field", info.ident);
        quote! {
            const _: () = ::core::assert!(
                <#ty as ::sqlpatch::PatchField>::KIND.is_record(),
                #message
            );
        }
    });

    let field_arms = infos.iter().enumerate().map(|(index, info)| {
        let ident = info.ident;
        if info.excluded {
            quote! { #index => ::sqlpatch::FieldValue::NonStorable, }
        } else {
            quote! { #index => ::sqlpatch::PatchField::field_value(&self.#ident), }
        }
    });

    let loads = infos.iter().enumerate().filter(|(_, info)| !info.excluded).map(|(index, info)| {
        let ident = info.ident;
        quote! {
            ::sqlpatch::PatchField::load_from(&mut self.#ident, &source.#ident, &fields[#index], loader);
        }
    });

    Ok(quote! {
        #(#embed_checks)*

        impl ::sqlpatch::Record for #name {
            fn descriptor(&self) -> &'static ::sqlpatch::RecordDescriptor {
                static DESCRIPTOR: ::sqlpatch::RecordDescriptor = ::sqlpatch::RecordDescriptor {
                    name: #name_str,
                    table: #table,
                    fields: &[#(#descriptors),*],
                };
                &DESCRIPTOR
            }

            fn field(&self, index: usize) -> ::sqlpatch::FieldValue<'_> {
                match index {
                    #(#field_arms)*
                    _ => ::sqlpatch::FieldValue::Absent,
                }
            }

            #[allow(unused_variables)]
            fn load_fields(&mut self, source: &Self, loader: &::sqlpatch::Loader<'_>) {
                let fields = ::sqlpatch::Record::descriptor(self).fields;
                #(#loads)*
            }
        }

        impl ::sqlpatch::PatchField for #name {
            const KIND: ::sqlpatch::FieldKind = ::sqlpatch::FieldKind::Record;

            fn field_value(&self) -> ::sqlpatch::FieldValue<'_> {
                ::sqlpatch::FieldValue::Record(self)
            }

            fn load_from(
                &mut self,
                source: &Self,
                field: &::sqlpatch::FieldDescriptor,
                loader: &::sqlpatch::Loader<'_>,
            ) {
                if loader.allowed(field) {
                    ::sqlpatch::Record::load_fields(self, source, loader);
                }
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use syn::parse_quote;

    #[test]
    fn test_rejects_generics() {
        let input: DeriveInput = parse_quote! {
            pub struct Wrapper<T> { pub inner: T }
        };
        let err = expand(input).unwrap_err();
        assert!(err.to_string().contains("generic"));
    }

    #[test]
    fn test_rejects_tuple_structs() {
        let input: DeriveInput = parse_quote! {
            pub struct Id(pub i64);
        };
        assert!(expand(input).is_err());
    }

    #[test]
    fn test_rejects_enums() {
        let input: DeriveInput = parse_quote! {
            pub enum Kind { A, B }
        };
        assert!(expand(input).is_err());
    }

    #[test]
    fn test_expands_descriptor() {
        let input: DeriveInput = parse_quote! {
            #[sqlpatch(table = "people")]
            pub struct Person {
                #[sqlpatch(db = "id", skip)]
                pub id: i64,
                pub name: Option<String>,
                secret: String,
            }
        };
        let out = expand(input).unwrap().to_string();
        assert!(out.contains("\"people\""));
        assert!(out.contains("\"patch\""));
        assert!(out.contains("\"skip\""));
        assert!(out.contains("\"secret\""));
        assert!(out.contains("PatchField for Person"));
    }

    #[test]
    fn test_excluded_fields_need_no_field_impl() {
        let input: DeriveInput = parse_quote! {
            pub struct Widget {
                pub name: String,
                #[sqlpatch(skip)]
                pub tags: Vec<String>,
                #[sqlpatch(patch = "skip")]
                pub labels: Vec<String>,
                on_change: Option<Box<dyn Fn() + Send + Sync>>,
            }
        };
        let out: String = expand(input)
            .unwrap()
            .to_string()
            .chars()
            .filter(|c| !c.is_whitespace())
            .collect();
        assert!(out.contains("<Stringas::sqlpatch::PatchField>::KIND"));
        assert!(!out.contains("Vec<String>as"));
        assert!(!out.contains("Sync>>as"));
        assert!(!out.contains("self.tags"));
        assert!(!out.contains("self.labels"));
        assert!(!out.contains("self.on_change"));
    }
}
