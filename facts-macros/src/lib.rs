//! Proc macros for constrained model output.
//!
//! `#[derive(Tool)]` turns a plain struct into a Claude tool definition
//! whose JSON schema mirrors the struct's fields. Forcing the model to call
//! that tool is how the feed asks for strictly shaped JSON.
//!
//! # Example
//!
//! ```ignore
//! /// A single piece of trivia
//! #[derive(Tool)]
//! struct FactEntry {
//!     /// Short subject, two or three words
//!     topic: String,
//!     /// One or two sentences
//!     fact: String,
//! }
//!
//! /// Record a batch of facts
//! #[derive(Tool)]
//! #[tool(name = "record_facts")]
//! struct RecordFacts {
//!     #[tool(nested)]
//!     facts: Vec<FactEntry>,
//! }
//! ```

use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use syn::{parse_macro_input, Attribute, DeriveInput, Field, Lit, Meta, Type};

/// Derive macro for generating Tool implementations.
///
/// # Attributes
///
/// - `#[tool(name = "...")]` - Override the tool name (defaults to snake_case struct name)
/// - `#[tool(optional)]` on fields - Leave the field out of `required`
/// - `#[tool(rename = "...")]` on fields - Override field name in schema
/// - `#[tool(nested)]` on fields - The field's type (or `Vec` item type) also
///   derives `Tool`; embed its schema instead of a bare `object`
#[proc_macro_derive(Tool, attributes(tool))]
pub fn derive_tool(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    expand_tool(input)
        .unwrap_or_else(|err| err.to_compile_error())
        .into()
}

/// Per-field `#[tool(...)]` settings.
#[derive(Default)]
struct FieldAttrs {
    rename: Option<String>,
    optional: bool,
    nested: bool,
}

impl FieldAttrs {
    fn parse(field: &Field) -> syn::Result<Self> {
        let mut attrs = FieldAttrs::default();
        for attr in tool_attrs(&field.attrs) {
            attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("rename") {
                    let lit: syn::LitStr = meta.value()?.parse()?;
                    attrs.rename = Some(lit.value());
                } else if meta.path.is_ident("optional") {
                    attrs.optional = true;
                } else if meta.path.is_ident("nested") {
                    attrs.nested = true;
                } else {
                    return Err(meta.error("expected `rename`, `optional` or `nested`"));
                }
                Ok(())
            })?;
        }
        Ok(attrs)
    }
}

fn tool_attrs(attrs: &[Attribute]) -> impl Iterator<Item = &Attribute> {
    attrs.iter().filter(|a| a.path().is_ident("tool"))
}

fn expand_tool(input: DeriveInput) -> syn::Result<TokenStream2> {
    let ident = &input.ident;
    let name = tool_name(&input)?;
    let description = doc_text(&input.attrs);

    let syn::Data::Struct(data) = &input.data else {
        return Err(syn::Error::new_spanned(ident, "#[derive(Tool)] needs a struct"));
    };
    let syn::Fields::Named(named) = &data.fields else {
        return Err(syn::Error::new_spanned(ident, "#[derive(Tool)] needs named fields"));
    };

    let mut inserts = Vec::new();
    let mut required = Vec::new();

    for field in &named.named {
        let attrs = FieldAttrs::parse(field)?;
        let key = match (attrs.rename, &field.ident) {
            (Some(rename), _) => rename,
            (None, Some(ident)) => ident.to_string(),
            (None, None) => return Err(syn::Error::new_spanned(field, "unnamed field")),
        };
        let schema = schema_for(&field.ty, attrs.nested);
        let doc = doc_text(&field.attrs);
        let describe = (!doc.is_empty()).then(|| {
            quote! { schema["description"] = serde_json::Value::from(#doc); }
        });

        inserts.push(quote! {
            let mut schema = #schema;
            #describe
            properties.insert(#key.to_owned(), schema);
        });

        if !attrs.optional && !wraps(&field.ty, "Option") {
            required.push(key);
        }
    }

    Ok(quote! {
        impl #ident {
            pub fn tool_name() -> &'static str {
                #name
            }

            pub fn tool_description() -> &'static str {
                #description
            }

            /// JSON schema of the tool input, one property per field.
            pub fn input_schema() -> serde_json::Value {
                let mut properties = serde_json::Map::new();
                #({ #inserts })*
                serde_json::json!({
                    "type": "object",
                    "properties": properties,
                    "required": [#(#required),*],
                })
            }

            pub fn as_tool() -> claude::Tool {
                claude::Tool {
                    name: Self::tool_name().to_owned(),
                    description: Self::tool_description().to_owned(),
                    input_schema: Self::input_schema(),
                }
            }
        }
    })
}

/// `#[tool(name = "...")]` on the struct, else the snake_cased struct name.
fn tool_name(input: &DeriveInput) -> syn::Result<String> {
    let mut name = None;
    for attr in tool_attrs(&input.attrs) {
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("name") {
                let lit: syn::LitStr = meta.value()?.parse()?;
                name = Some(lit.value());
                Ok(())
            } else {
                Err(meta.error("expected `name`"))
            }
        })?;
    }
    Ok(name.unwrap_or_else(|| snake_case(&input.ident.to_string())))
}

/// Doc comment lines joined with spaces.
fn doc_text(attrs: &[Attribute]) -> String {
    let mut lines = Vec::new();
    for attr in attrs.iter().filter(|a| a.path().is_ident("doc")) {
        if let Meta::NameValue(syn::MetaNameValue {
            value: syn::Expr::Lit(syn::ExprLit { lit: Lit::Str(s), .. }),
            ..
        }) = &attr.meta
        {
            let line = s.value();
            if !line.trim().is_empty() {
                lines.push(line.trim().to_owned());
            }
        }
    }
    lines.join(" ")
}

/// Whether `ty` is a path type whose last segment is `wrapper`.
fn wraps(ty: &Type, wrapper: &str) -> bool {
    last_segment(ty).is_some_and(|segment| segment.ident == wrapper)
}

fn last_segment(ty: &Type) -> Option<&syn::PathSegment> {
    match ty {
        Type::Path(path) => path.path.segments.last(),
        _ => None,
    }
}

fn type_argument(segment: &syn::PathSegment) -> Option<&Type> {
    let syn::PathArguments::AngleBracketed(args) = &segment.arguments else {
        return None;
    };
    args.args.iter().find_map(|arg| match arg {
        syn::GenericArgument::Type(ty) => Some(ty),
        _ => None,
    })
}

const INTEGERS: [&str; 12] = [
    "i8", "i16", "i32", "i64", "i128", "isize", "u8", "u16", "u32", "u64", "u128", "usize",
];

fn schema_for(ty: &Type, nested: bool) -> TokenStream2 {
    let json_type = |kind: &str| quote! { serde_json::json!({ "type": #kind }) };

    let Some(segment) = last_segment(ty) else {
        return quote! { serde_json::json!({}) };
    };
    let ident = segment.ident.to_string();

    match ident.as_str() {
        "String" | "str" | "char" => json_type("string"),
        "bool" => json_type("boolean"),
        "f32" | "f64" => json_type("number"),
        int if INTEGERS.contains(&int) => json_type("integer"),
        "Option" => type_argument(segment)
            .map(|inner| schema_for(inner, nested))
            .unwrap_or_else(|| quote! { serde_json::json!({}) }),
        "Vec" => match type_argument(segment) {
            Some(inner) => {
                let items = schema_for(inner, nested);
                quote! { serde_json::json!({ "type": "array", "items": #items }) }
            }
            None => json_type("array"),
        },
        _ if nested => quote! { <#ty>::input_schema() },
        _ => json_type("object"),
    }
}

fn snake_case(name: &str) -> String {
    let mut out = String::with_capacity(name.len() + 4);
    for c in name.chars() {
        if c.is_uppercase() && !out.is_empty() {
            out.push('_');
        }
        out.extend(c.to_lowercase());
    }
    out
}
