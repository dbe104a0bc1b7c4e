use crate::attributes::{ConstructibleAttributes, FieldAttributes};
use itertools::Itertools;
use proc_macro2::{Ident, TokenStream};
use quote::{format_ident, quote};
use syn::spanned::Spanned;
use syn::{
    Attribute, Data, DataStruct, DeriveInput, Error, Field, Fields, GenericArgument, PathArguments,
    Result, Type, TypeParamBound, TypePath,
};

const CONSTRUCTIBLE: &str = "constructible";
const INJECT: &str = "inject";
const AUTO_TRAITS: [&str; 5] = ["Send", "Sync", "Unpin", "UnwindSafe", "RefUnwindSafe"];

enum FieldKind {
    Dependency { identifier: String, target: Type },
    Placeholder,
}

struct InjectedField<'a> {
    field: &'a Field,
    kind: FieldKind,
    attributes: FieldAttributes,
}

fn pointer_target(ty: &Type) -> Option<&Type> {
    if let Type::Path(TypePath { qself: None, path }) = ty {
        let segment = path.segments.last()?;
        if segment.ident != "InstancePtr" && segment.ident != "Arc" {
            return None;
        }

        if let PathArguments::AngleBracketed(arguments) = &segment.arguments {
            if arguments.args.len() == 1 {
                if let Some(GenericArgument::Type(target)) = arguments.args.first() {
                    return Some(target);
                }
            }
        }
    }

    None
}

fn type_identifier(ty: &Type) -> Option<String> {
    match ty {
        Type::Path(TypePath { path, .. }) => {
            path.segments.last().map(|segment| segment.ident.to_string())
        }
        // the contract is the first bound which isn't an auto trait
        Type::TraitObject(object) => object.bounds.iter().find_map(|bound| {
            if let TypeParamBound::Trait(bound) = bound {
                bound
                    .path
                    .segments
                    .last()
                    .map(|segment| segment.ident.to_string())
                    .filter(|ident| !AUTO_TRAITS.contains(&ident.as_str()))
            } else {
                None
            }
        }),
        Type::Paren(ty) => type_identifier(&ty.elem),
        Type::Group(ty) => type_identifier(&ty.elem),
        _ => None,
    }
}

fn extract_field_attributes(attributes: &[Attribute]) -> Result<FieldAttributes> {
    attributes
        .iter()
        .find(|attribute| attribute.path().is_ident(INJECT))
        .map(FieldAttributes::try_from)
        .unwrap_or(Ok(FieldAttributes {
            name: None,
            default: None,
            ignore: false,
        }))
}

fn extract_constructible_attributes(
    attributes: &[Attribute],
) -> Result<Option<ConstructibleAttributes>> {
    attributes
        .iter()
        .filter(|attribute| attribute.path().is_ident(CONSTRUCTIBLE))
        .map(ConstructibleAttributes::try_from)
        .next()
        .transpose()
}

fn inspect_field(field: &Field) -> Result<InjectedField<'_>> {
    let attributes = extract_field_attributes(&field.attrs)?;
    let kind = match pointer_target(&field.ty) {
        Some(target) if attributes.default.is_none() => {
            let identifier = match &attributes.name {
                Some(name) => name.value(),
                None => type_identifier(target).ok_or_else(|| {
                    Error::new(
                        field.ty.span(),
                        "Cannot infer dependency identifier - use #[inject(name = \"...\")]!",
                    )
                })?,
            };

            FieldKind::Dependency {
                identifier,
                target: target.clone(),
            }
        }
        _ => {
            if attributes.name.is_some() {
                return Err(Error::new(
                    field.span(),
                    "Only InstancePtr fields can be injected by name!",
                ));
            }

            FieldKind::Placeholder
        }
    };

    Ok(InjectedField {
        field,
        kind,
        attributes,
    })
}

fn generate_default(field: &InjectedField) -> TokenStream {
    match &field.attributes.default {
        Some(path) => quote!(#path()),
        None => quote!(std::default::Default::default()),
    }
}

fn generate_parameter(field: &InjectedField) -> Option<TokenStream> {
    if field.attributes.ignore {
        return None;
    }

    Some(match &field.kind {
        FieldKind::Dependency { identifier, .. } => {
            quote!(wirebox::reflect::Parameter::dependency(#identifier))
        }
        FieldKind::Placeholder => quote!(wirebox::reflect::Parameter::Placeholder),
    })
}

fn generate_argument(field: &InjectedField) -> TokenStream {
    if field.attributes.ignore {
        return generate_default(field);
    }

    match &field.kind {
        FieldKind::Dependency { target, .. } => quote! {
            arguments.instance::<#target>()?
        },
        FieldKind::Placeholder => {
            let default = generate_default(field);
            quote! {
                {
                    arguments.placeholder()?;
                    #default
                }
            }
        }
    }
}

fn make_struct(fields: &Fields, injected: &[InjectedField]) -> TokenStream {
    let arguments = injected.iter().map(generate_argument);
    match fields {
        Fields::Named(_) => {
            let idents = injected.iter().map(|field| &field.field.ident);
            quote! {
                Ok(Self {
                    #(#idents: #arguments),*
                })
            }
        }
        Fields::Unnamed(_) => quote! {
            Ok(Self(#(#arguments),*))
        },
        Fields::Unit => quote! {
            Ok(Self)
        },
    }
}

fn make_with_constructor(constructor: &syn::ExprPath, injected: &[InjectedField]) -> TokenStream {
    let (names, values): (Vec<Ident>, Vec<TokenStream>) = injected
        .iter()
        .filter(|field| !field.attributes.ignore)
        .enumerate()
        .map(|(index, field)| (format_ident!("argument_{}", index), generate_argument(field)))
        .unzip();

    quote! {
        #(let #names = #values;)*
        #constructor(#(#names),*).map_err(|error| wirebox::ResolutionError::ConstructionFailed {
            identifier: arguments.identifier().clone(),
            error,
        })
    }
}

pub fn expand_constructible(input: &DeriveInput) -> Result<TokenStream> {
    let Data::Struct(DataStruct { fields, .. }) = &input.data else {
        return Err(Error::new(
            input.span(),
            "Can only derive Constructible on structs!",
        ));
    };

    let ident = &input.ident;
    let attributes = extract_constructible_attributes(&input.attrs)?;
    let (name, constructor) = match attributes {
        Some(ConstructibleAttributes { name, constructor }) => (name, constructor),
        None => (None, None),
    };
    let name = name
        .map(|name| name.value())
        .unwrap_or_else(|| ident.to_string());

    let injected: Vec<_> = fields.iter().map(inspect_field).try_collect()?;
    let parameters = injected.iter().filter_map(generate_parameter);
    let construction = match &constructor {
        Some(constructor) => make_with_constructor(constructor, &injected),
        None => make_struct(fields, &injected),
    };

    Ok(quote! {
        #[automatically_derived]
        impl wirebox::reflect::Constructible for #ident {
            const NAME: &'static str = #name;

            fn parameters() -> Vec<wirebox::reflect::Parameter> {
                vec![#(#parameters),*]
            }

            #[allow(unused_variables)]
            fn construct(
                arguments: &mut wirebox::reflect::Arguments,
            ) -> Result<Self, wirebox::ResolutionError> {
                #construction
            }
        }

        const _: () = {
            fn register() -> wirebox::reflect::TypeDescriptor {
                wirebox::reflect::TypeDescriptor::of::<#ident>()
            }

            wirebox::registry::internal::submit! {
                wirebox::registry::internal::TypeRegisterer {
                    register
                }
            };
        };
    })
}
