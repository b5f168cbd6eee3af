//! Routing annotations on resource methods

use proc_macro2::{Span, TokenStream};
use quote::quote;
use syn::parse::{Parse, ParseStream};
use syn::{Attribute, Ident, LitStr, Meta, Token};

/// Shortcut attributes and the method they stand for
const SHORTCUTS: [(&str, &str); 7] = [
    ("get", "GET"),
    ("post", "POST"),
    ("put", "PUT"),
    ("patch", "PATCH"),
    ("delete", "DELETE"),
    ("head", "HEAD"),
    ("options", "OPTIONS"),
];

const METHODS: [&str; 10] = [
    "GET", "POST", "PUT", "PATCH", "DELETE", "HEAD", "OPTIONS", "TRACE", "CONNECT", "ALL",
];

/// One `(method, path)` annotation
#[derive(Debug, Clone)]
pub struct RouteAnnotation {
    pub method: Ident,
    pub path: LitStr,
}

impl RouteAnnotation {
    pub fn method_tokens(&self) -> TokenStream {
        let method = &self.method;
        quote! { ::trellis_http::HttpMethod::#method }
    }
}

/// Name of the routing attribute, if `attr` is one
pub fn route_attr_name(attr: &Attribute) -> Option<String> {
    let name = attr.path().segments.last()?.ident.to_string();
    let known = name == "route" || SHORTCUTS.iter().any(|(shortcut, _)| *shortcut == name);
    known.then_some(name)
}

/// Parse a routing attribute into its annotation
pub fn parse_route_attr(attr: &Attribute) -> syn::Result<RouteAnnotation> {
    let name = route_attr_name(attr)
        .ok_or_else(|| syn::Error::new_spanned(attr, "not a routing attribute"))?;
    let span = attr.path().segments.last().map_or_else(Span::call_site, |segment| segment.ident.span());

    let tokens = match &attr.meta {
        Meta::Path(_) => TokenStream::new(),
        Meta::List(list) => list.tokens.clone(),
        Meta::NameValue(_) => {
            return Err(syn::Error::new_spanned(
                attr,
                format!(
                    "Unexpected `=` in #[{}]. Hint: write #[{}(\"/path\")]",
                    name, name
                ),
            ))
        }
    };

    if name == "route" {
        let args: RouteArgs = syn::parse2(tokens)?;
        let method = args
            .method
            .unwrap_or_else(|| Ident::new("ALL", span));
        let path = args.path.unwrap_or_else(|| LitStr::new("", span));
        return Ok(RouteAnnotation { method, path });
    }

    let method = SHORTCUTS
        .iter()
        .find(|(shortcut, _)| *shortcut == name)
        .map(|(_, method)| Ident::new(method, span))
        .ok_or_else(|| syn::Error::new(span, "unknown routing attribute"))?;
    let path = if tokens.is_empty() {
        LitStr::new("", span)
    } else {
        syn::parse2::<LitStr>(tokens).map_err(|error| {
            syn::Error::new(
                error.span(),
                format!(
                    "Invalid path argument for #[{}]. Hint: use a string literal like #[{}(\"/users/[id]\")]",
                    name, name
                ),
            )
        })?
    };
    Ok(RouteAnnotation { method, path })
}

/// Arguments of `#[route(...)]`
struct RouteArgs {
    method: Option<Ident>,
    path: Option<LitStr>,
}

impl Parse for RouteArgs {
    fn parse(input: ParseStream) -> syn::Result<Self> {
        if input.is_empty() {
            return Ok(Self {
                method: None,
                path: None,
            });
        }
        if input.peek(LitStr) {
            let path = input.parse()?;
            return Ok(Self {
                method: None,
                path: Some(path),
            });
        }

        let method: Ident = input.parse()?;
        let upper = method.to_string().to_ascii_uppercase();
        if !METHODS.contains(&upper.as_str()) {
            return Err(syn::Error::new(
                method.span(),
                format!(
                    "Unknown HTTP method `{}`. Hint: use one of {}",
                    method,
                    METHODS.join(", ")
                ),
            ));
        }
        let method = Ident::new(&upper, method.span());

        if input.is_empty() {
            return Ok(Self {
                method: Some(method),
                path: None,
            });
        }
        input.parse::<Token![,]>()?;
        let path = input.parse()?;
        Ok(Self {
            method: Some(method),
            path: Some(path),
        })
    }
}

/// Expansion of a routing attribute used outside a `#[resource]` impl
pub fn outside_resource(name: &str, _args: TokenStream, input: TokenStream) -> TokenStream {
    let error = syn::Error::new(
        Span::call_site(),
        format!(
            "#[{}] only applies to methods of an impl block marked #[resource]. Hint: add #[resource] to the enclosing impl",
            name
        ),
    )
    .to_compile_error();

    quote! {
        #error
        #input
    }
}
