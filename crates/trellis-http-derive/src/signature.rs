//! Classification of method signatures into manifest shapes

use proc_macro2::TokenStream;
use quote::{quote, ToTokens};
use syn::{FnArg, GenericArgument, PathArguments, ReturnType, Signature, Type};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReceiverShape {
    None,
    Shared,
    Other(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeShape {
    Context,
    HandlerResult,
    Unit,
    Other(String),
}

/// What a method looks like to the router
#[derive(Debug, Clone)]
pub struct Shape {
    pub receiver: ReceiverShape,
    pub parameters: Vec<TypeShape>,
    pub returns: TypeShape,
    pub is_async: bool,
    pub is_constructor: bool,
}

impl Shape {
    pub fn of(sig: &Signature) -> Self {
        let mut receiver = ReceiverShape::None;
        let mut parameters = Vec::new();

        for input in &sig.inputs {
            match input {
                FnArg::Receiver(recv) => {
                    receiver = if recv.reference.is_some() && recv.mutability.is_none() {
                        ReceiverShape::Shared
                    } else {
                        ReceiverShape::Other(recv.to_token_stream().to_string())
                    };
                }
                FnArg::Typed(arg) => parameters.push(classify_param(&arg.ty)),
            }
        }

        let returns = match &sig.output {
            ReturnType::Default => TypeShape::Unit,
            ReturnType::Type(_, ty) => classify_return(ty),
        };
        let is_constructor = receiver == ReceiverShape::None && returns_self(&sig.output);

        Self {
            receiver,
            parameters,
            returns,
            is_async: sig.asyncness.is_some(),
            is_constructor,
        }
    }

    /// Reason this method cannot handle requests, if any
    pub fn validate(&self) -> Result<(), String> {
        if self.is_constructor {
            return Err("is a constructor".to_string());
        }
        if self.is_async {
            return Err("must not be async".to_string());
        }
        if let ReceiverShape::Other(receiver) = &self.receiver {
            return Err(format!("takes `{}` but only `&self` or no receiver is allowed", receiver));
        }
        if !matches!(self.returns, TypeShape::HandlerResult | TypeShape::Unit) {
            return Err("must return HttpResult<()>".to_string());
        }
        if self.parameters.len() != 1 || self.parameters[0] != TypeShape::Context {
            return Err("must take exactly one `&mut HttpContext` parameter".to_string());
        }
        Ok(())
    }

    /// `MethodKind` the manifest records for this method
    pub fn kind_tokens(&self) -> TokenStream {
        if self.is_constructor {
            quote! { ::trellis_http::scanning::MethodKind::Constructor }
        } else {
            quote! { ::trellis_http::scanning::MethodKind::Regular }
        }
    }

    /// `MethodSignature` literal for this method
    pub fn signature_tokens(&self) -> TokenStream {
        let receiver = match &self.receiver {
            ReceiverShape::None => quote! { ::trellis_http::scanning::Receiver::None },
            ReceiverShape::Shared => quote! { ::trellis_http::scanning::Receiver::Shared },
            ReceiverShape::Other(text) => {
                quote! { ::trellis_http::scanning::Receiver::Other(::std::string::String::from(#text)) }
            }
        };
        let parameters = self.parameters.iter().map(type_tokens);
        let returns = type_tokens(&self.returns);

        quote! {
            ::trellis_http::scanning::MethodSignature {
                receiver: #receiver,
                parameters: ::std::vec![#(#parameters),*],
                returns: #returns,
            }
        }
    }
}

fn type_tokens(shape: &TypeShape) -> TokenStream {
    match shape {
        TypeShape::Context => quote! { ::trellis_http::scanning::TypeRef::Context },
        TypeShape::HandlerResult => quote! { ::trellis_http::scanning::TypeRef::HandlerResult },
        TypeShape::Unit => quote! { ::trellis_http::scanning::TypeRef::Unit },
        TypeShape::Other(text) => {
            quote! { ::trellis_http::scanning::TypeRef::Other(::std::string::String::from(#text)) }
        }
    }
}

fn last_segment_is(ty: &Type, name: &str) -> bool {
    match ty {
        Type::Path(path) => path
            .path
            .segments
            .last()
            .is_some_and(|segment| segment.ident == name),
        _ => false,
    }
}

fn is_unit(ty: &Type) -> bool {
    matches!(ty, Type::Tuple(tuple) if tuple.elems.is_empty())
}

fn classify_param(ty: &Type) -> TypeShape {
    match ty {
        Type::Reference(reference)
            if reference.mutability.is_some() && last_segment_is(&reference.elem, "HttpContext") =>
        {
            TypeShape::Context
        }
        other => TypeShape::Other(other.to_token_stream().to_string()),
    }
}

fn classify_return(ty: &Type) -> TypeShape {
    if is_unit(ty) {
        return TypeShape::Unit;
    }

    if let Type::Path(path) = ty {
        if let Some(segment) = path.path.segments.last() {
            let args: Vec<&Type> = match &segment.arguments {
                PathArguments::AngleBracketed(angle) => angle
                    .args
                    .iter()
                    .filter_map(|arg| match arg {
                        GenericArgument::Type(ty) => Some(ty),
                        _ => None,
                    })
                    .collect(),
                _ => Vec::new(),
            };

            let handler_result = match segment.ident.to_string().as_str() {
                "HttpResult" => args.len() == 1 && is_unit(args[0]),
                "Result" => args.len() == 2 && is_unit(args[0]) && last_segment_is(args[1], "HttpError"),
                _ => false,
            };
            if handler_result {
                return TypeShape::HandlerResult;
            }
        }
    }

    TypeShape::Other(ty.to_token_stream().to_string())
}

fn returns_self(output: &ReturnType) -> bool {
    match output {
        ReturnType::Type(_, ty) => last_segment_is(ty, "Self"),
        ReturnType::Default => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use syn::parse_quote;

    fn shape(sig: Signature) -> Shape {
        Shape::of(&sig)
    }

    #[test]
    fn test_handler_shapes_are_valid() {
        let method = shape(parse_quote!(fn show(&self, ctx: &mut HttpContext) -> HttpResult<()>));
        assert_eq!(method.receiver, ReceiverShape::Shared);
        assert!(method.validate().is_ok());

        let function =
            shape(parse_quote!(fn show(ctx: &mut trellis_http::HttpContext) -> Result<(), HttpError>));
        assert_eq!(function.receiver, ReceiverShape::None);
        assert!(function.validate().is_ok());

        let unit = shape(parse_quote!(fn touch<'a>(ctx: &'a mut HttpContext)));
        assert_eq!(unit.returns, TypeShape::Unit);
        assert!(unit.validate().is_ok());
    }

    #[test]
    fn test_invalid_shapes() {
        let cases: Vec<(Signature, &str)> = vec![
            (parse_quote!(fn a(&mut self, ctx: &mut HttpContext) -> HttpResult<()>), "receiver"),
            (parse_quote!(fn b(&self, ctx: &HttpContext) -> HttpResult<()>), "parameter"),
            (parse_quote!(fn c(&self) -> HttpResult<()>), "parameter"),
            (parse_quote!(fn d(&self, ctx: &mut HttpContext) -> String), "return"),
            (parse_quote!(fn e(&self, ctx: &mut HttpContext) -> HttpResult<String>), "return"),
            (parse_quote!(async fn f(&self, ctx: &mut HttpContext) -> HttpResult<()>), "async"),
            (parse_quote!(fn new() -> Self), "constructor"),
        ];

        for (sig, fragment) in cases {
            let name = sig.ident.to_string();
            let reason = Shape::of(&sig).validate().unwrap_err();
            assert!(reason.contains(fragment), "{}: {}", name, reason);
        }
    }

    #[test]
    fn test_constructor_kind() {
        let ctor = shape(parse_quote!(fn new() -> Self));
        assert!(ctor.kind_tokens().to_string().contains("Constructor"));

        let builder = shape(parse_quote!(fn with(self) -> Self));
        assert!(builder.kind_tokens().to_string().contains("Regular"));
    }
}
