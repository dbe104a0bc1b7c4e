use crate::attributes::ContractAttributes;
use proc_macro2::TokenStream;
use quote::quote;
use std::ops::Deref;
use syn::spanned::Spanned;
use syn::{Error, Item, Result, Type};

pub fn register_contract(item: &Item, args: &ContractAttributes) -> Result<TokenStream> {
    let Item::Trait(item_trait) = item else {
        return Err(Error::new(
            item.span(),
            "Contracts can only be declared on traits!",
        ));
    };

    let ident = &item_trait.ident;
    let name = args
        .name
        .as_ref()
        .map(|name| name.value())
        .unwrap_or_else(|| ident.to_string());

    Ok(quote! {
        #item

        const _: () = {
            fn register() -> wirebox::reflect::TypeDescriptor {
                wirebox::reflect::TypeDescriptor::contract::<dyn #ident + Send + Sync>(#name)
            }

            wirebox::registry::internal::submit! {
                wirebox::registry::internal::TypeRegisterer {
                    register
                }
            };
        };
    })
}

pub fn register_contract_impl(item: &Item) -> Result<TokenStream> {
    let Item::Impl(item_impl) = item else {
        return Err(Error::new(
            item.span(),
            "Registering contracts is possible only on trait implementations!",
        ));
    };

    let trait_type = item_impl
        .trait_
        .as_ref()
        .map(|(_, path, ..)| path)
        .ok_or_else(|| Error::new(item.span(), "Missing trait identifier!"))?;

    let target_type = if let Type::Path(path) = item_impl.self_ty.deref() {
        &path.path
    } else {
        return Err(Error::new(
            item.span(),
            "Registering contracts is only available for named types!",
        ));
    };

    Ok(quote! {
        #item

        const _: () = {
            fn cast(
                instance: wirebox::instance::InstanceAnyPtr,
            ) -> Result<Box<dyn std::any::Any>, wirebox::instance::InstanceAnyPtr> {
                instance.downcast::<#target_type>().map(|instance| {
                    Box::new(instance as wirebox::instance::InstancePtr<dyn #trait_type + Send + Sync>)
                        as Box<dyn std::any::Any>
                })
            }

            fn register() -> (std::any::TypeId, wirebox::instance::Cast) {
                (
                    std::any::TypeId::of::<#target_type>(),
                    wirebox::instance::Cast::new::<dyn #trait_type + Send + Sync>(cast),
                )
            }

            wirebox::registry::internal::submit! {
                wirebox::registry::internal::CastRegisterer {
                    register
                }
            };
        };
    })
}
