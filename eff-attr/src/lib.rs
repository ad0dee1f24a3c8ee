extern crate proc_macro;

use proc_macro::TokenStream;
use quote::quote;
use syn::spanned::Spanned;

type TokenStream2 = proc_macro2::TokenStream;

/// Declare the function to be an effectful computation
///
/// The function must return `Result<T, _>` (or `eff::Result<T>`). The attribute turns it into a
/// function returning `eff::Computation<T>` whose body runs when the computation is driven,
/// like what `async fn` does for futures. Arguments are moved into the computation, so they
/// must be `'static`.
#[proc_macro_attribute]
pub fn eff(attr: TokenStream, item: TokenStream) -> TokenStream {
    match expand(attr.into(), item.into()) {
        Ok(tokens) => tokens.into(),
        Err(e) => e.to_compile_error().into(),
    }
}

fn expand(attr: TokenStream2, item: TokenStream2) -> syn::Result<TokenStream2> {
    if !attr.is_empty() {
        return Err(syn::Error::new(attr.span(), "#[eff] takes no arguments"));
    }

    let mut func: syn::ItemFn = syn::parse2(item)?;
    if let Some(asyncness) = func.sig.asyncness {
        return Err(syn::Error::new(
            asyncness.span(),
            "effectful functions cannot be async",
        ));
    }

    let output = match &func.sig.output {
        syn::ReturnType::Type(_, ty) => ok_type(ty)?,
        syn::ReturnType::Default => {
            return Err(syn::Error::new(
                func.sig.span(),
                "effectful functions must return a `Result`",
            ))
        }
    };

    let original_block = func.block;
    func.sig.output = syn::parse2(quote! {
        -> ::eff::Computation<#output>
    })?;
    func.block = syn::parse2(quote! {
        {
            ::eff::Computation::new(async move #original_block)
        }
    })?;

    Ok(quote! { #func })
}

/// Extract `T` from `Result<T, E>`
fn ok_type(ty: &syn::Type) -> syn::Result<syn::Type> {
    if let syn::Type::Path(path) = ty {
        if let Some(segment) = path.path.segments.last() {
            if segment.ident == "Result" {
                if let syn::PathArguments::AngleBracketed(args) = &segment.arguments {
                    if let Some(syn::GenericArgument::Type(ok)) = args.args.first() {
                        return Ok(ok.clone());
                    }
                }
            }
        }
    }
    Err(syn::Error::new(
        ty.span(),
        "effectful functions must return a `Result`",
    ))
}
