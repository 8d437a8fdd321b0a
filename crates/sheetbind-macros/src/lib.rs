use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use syn::{Data, DeriveInput, Expr, Fields, LitStr, parse_macro_input, spanned::Spanned};

/// Derive `sheetbind::SheetRecord`.
///
/// Only fields carrying `#[sheet(...)]` are mapped:
///
/// - `name = "Header"`: header text to match; defaults to the field name.
/// - `order = N`: column position on write (ascending); defaults to the
///   field's position in the struct.
#[proc_macro_derive(SheetRecord, attributes(sheet))]
pub fn derive_sheet_record(item: TokenStream) -> TokenStream {
    let input = parse_macro_input!(item as DeriveInput);
    expand(input)
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}

struct MappedField {
    ident: syn::Ident,
    name: String,
    order: TokenStream2,
}

fn expand(input: DeriveInput) -> syn::Result<TokenStream2> {
    /* -------- 1 · named struct fields only -------- */
    let fields = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(named) => &named.named,
            other => {
                return Err(syn::Error::new(
                    other.span(),
                    "SheetRecord needs a struct with named fields",
                ));
            }
        },
        _ => {
            return Err(syn::Error::new(
                input.ident.span(),
                "SheetRecord can only be derived for structs",
            ));
        }
    };

    /* -------- 2 · examine #[sheet(...)] on each field -------- */
    let mut mapped = Vec::new();
    for (position, field) in fields.iter().enumerate() {
        let Some(attr) = field.attrs.iter().find(|a| a.path().is_ident("sheet")) else {
            continue;
        };
        let Some(ident) = field.ident.clone() else {
            continue;
        };
        let mut name = ident.to_string();
        let position = position as i32;
        let mut order = quote! { #position };

        // A bare `#[sheet]` maps the field with its defaults.
        if !matches!(attr.meta, syn::Meta::Path(_)) {
            attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("name") {
                    let lit: LitStr = meta.value()?.parse()?;
                    name = lit.value();
                    Ok(())
                } else if meta.path.is_ident("order") {
                    let expr: Expr = meta.value()?.parse()?;
                    order = quote! { #expr };
                    Ok(())
                } else {
                    Err(meta.error("expected `name` or `order`"))
                }
            })?;
        }

        mapped.push(MappedField { ident, name, order });
    }

    /* -------- 3 · assemble the impl -------- */
    let ident = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();
    let registrations = mapped.iter().map(|f| {
        let field = &f.ident;
        let name = &f.name;
        let order = &f.order;
        quote! {
            .field(
                #name,
                #order,
                |record: &Self| &record.#field,
                |record: &mut Self| &mut record.#field,
            )
        }
    });

    Ok(quote! {
        impl #impl_generics ::sheetbind::SheetRecord for #ident #ty_generics #where_clause {
            fn schema() -> ::sheetbind::FieldSchema<Self> {
                ::sheetbind::FieldSchema::builder()
                    #(#registrations)*
                    .build()
            }
        }
    })
}
