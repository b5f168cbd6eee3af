//! `#[resource]` implementation
//!
//! The impl block is emitted unchanged apart from its routing attributes,
//! followed by a `Resource` impl whose descriptor lists every method in
//! declaration order, and a load-time registration in the global catalog.

use crate::routes::{parse_route_attr, route_attr_name, RouteAnnotation};
use crate::signature::{ReceiverShape, Shape, TypeShape};
use proc_macro2::{Span, TokenStream};
use quote::quote;
use syn::parse::{Parse, ParseStream};
use syn::punctuated::Punctuated;
use syn::{Ident, ImplItem, ImplItemFn, ItemImpl, LitStr, Token};

/// Arguments of `#[resource(...)]`
#[derive(Debug, Default)]
pub struct ResourceArgs {
    pub base_path: Option<LitStr>,
    pub scope: Option<LitStr>,
}

enum ResourceArg {
    Bare(LitStr),
    Named(Ident, LitStr),
}

impl Parse for ResourceArg {
    fn parse(input: ParseStream) -> syn::Result<Self> {
        if input.peek(LitStr) {
            return Ok(ResourceArg::Bare(input.parse()?));
        }
        let key: Ident = input.parse()?;
        input.parse::<Token![=]>()?;
        Ok(ResourceArg::Named(key, input.parse()?))
    }
}

impl Parse for ResourceArgs {
    fn parse(input: ParseStream) -> syn::Result<Self> {
        let mut args = ResourceArgs::default();
        for arg in Punctuated::<ResourceArg, Token![,]>::parse_terminated(input)? {
            let (key, value) = match arg {
                ResourceArg::Bare(path) => (Ident::new("base_path", path.span()), path),
                ResourceArg::Named(key, value) => (key, value),
            };
            let slot = match key.to_string().as_str() {
                "base_path" | "path" => &mut args.base_path,
                "scope" => &mut args.scope,
                other => {
                    return Err(syn::Error::new(
                        key.span(),
                        format!(
                            "Unknown #[resource] argument `{}`. Hint: use base_path = \"..\" or scope = \"..\"",
                            other
                        ),
                    ))
                }
            };
            if slot.replace(value).is_some() {
                return Err(syn::Error::new(key.span(), format!("`{}` given twice", key)));
            }
        }
        Ok(args)
    }
}

pub fn resource_impl(args: TokenStream, input: TokenStream) -> TokenStream {
    match expand(args, input) {
        Ok(tokens) => tokens,
        Err(error) => error.to_compile_error(),
    }
}

fn expand(args: TokenStream, input: TokenStream) -> syn::Result<TokenStream> {
    let args: ResourceArgs = syn::parse2(args)?;
    let mut item: ItemImpl = syn::parse2(input).map_err(|error| {
        syn::Error::new(
            error.span(),
            "#[resource] applies to an inherent impl block. Hint: write #[resource] impl MyType { ... }",
        )
    })?;

    if let Some((_, path, _)) = &item.trait_ {
        return Err(syn::Error::new_spanned(
            path,
            "#[resource] cannot be used on a trait impl. Hint: move the handlers into an inherent impl block",
        ));
    }
    if !item.generics.params.is_empty() {
        return Err(syn::Error::new_spanned(
            &item.generics,
            "#[resource] types must not be generic, since they are registered once at load time",
        ));
    }

    let mut methods = Vec::new();
    for impl_item in &mut item.items {
        if let ImplItem::Fn(method) = impl_item {
            methods.push(describe_method(method)?);
        }
    }

    let self_ty = &item.self_ty;
    let base_path = args.base_path.unwrap_or_else(|| LitStr::new("", Span::call_site()));
    let scope = args.scope.unwrap_or_else(|| LitStr::new("", Span::call_site()));

    Ok(quote! {
        #item

        impl ::trellis_http::scanning::Resource for #self_ty {
            fn descriptor() -> ::trellis_http::scanning::TypeDescriptor {
                ::trellis_http::scanning::TypeDescriptor::of::<Self>()
                    .resource(#base_path, #scope)
                    #(.method(#methods))*
            }
        }

        ::trellis_http::__resource_auto_register!(#self_ty);
    })
}

/// Strip the routing attributes of `method` and build its descriptor expression
fn describe_method(method: &mut ImplItemFn) -> syn::Result<TokenStream> {
    let mut routes: Vec<RouteAnnotation> = Vec::new();
    let mut kept = Vec::with_capacity(method.attrs.len());
    let mut first_route_name = None;
    for attr in method.attrs.drain(..) {
        match route_attr_name(&attr) {
            Some(name) => {
                first_route_name.get_or_insert(name);
                routes.push(parse_route_attr(&attr)?);
            }
            None => kept.push(attr),
        }
    }
    method.attrs = kept;

    let ident = &method.sig.ident;
    let name = ident.to_string();
    let shape = Shape::of(&method.sig);
    let signature = shape.signature_tokens();
    let kind = shape.kind_tokens();

    if routes.is_empty() {
        return Ok(quote! {
            ::trellis_http::scanning::MethodDescriptor::declared(#name, #signature)
                .with_kind(#kind)
        });
    }

    if let Err(reason) = shape.validate() {
        let attr = first_route_name.unwrap_or_else(|| "route".to_string());
        return Err(syn::Error::new_spanned(
            &method.sig,
            format!(
                "#[{}] handler `{}` {}. Hint: use `fn {}(&self, ctx: &mut HttpContext) -> HttpResult<()>`",
                attr, name, reason, name
            ),
        ));
    }

    let finish = match shape.returns {
        TypeShape::Unit => quote! { ; ::core::result::Result::Ok(()) },
        _ => quote! {},
    };
    let constructor = match shape.receiver {
        ReceiverShape::Shared => quote! {
            ::trellis_http::scanning::MethodDescriptor::instance::<Self, _>(
                #name,
                |this: &Self, context: &mut ::trellis_http::HttpContext| {
                    this.#ident(context) #finish
                },
            )
        },
        _ => quote! {
            ::trellis_http::scanning::MethodDescriptor::function(
                #name,
                |context: &mut ::trellis_http::HttpContext| {
                    Self::#ident(context) #finish
                },
            )
        },
    };

    let route_calls = routes.iter().map(|route| {
        let method = route.method_tokens();
        let path = &route.path;
        quote! { .route(#method, #path) }
    });

    Ok(quote! {
        #constructor
            .with_signature(#signature)
            #(#route_calls)*
    })
}
