use crate::attributes::ContractAttributes;
use crate::constructible::expand_constructible;
use crate::contract::{register_contract, register_contract_impl};
use proc_macro::TokenStream;
use syn::{parse_macro_input, DeriveInput, Error, Item};

mod attributes;
mod constructible;
mod contract;

#[proc_macro_derive(Constructible, attributes(constructible, inject))]
pub fn generate_constructible(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    expand_constructible(&input)
        .unwrap_or_else(Error::into_compile_error)
        .into()
}

/// Registers a trait as an abstract contract. Making the contract without a binding fails, since
/// contracts are never instantiable.
#[proc_macro_attribute]
pub fn contract(args: TokenStream, input: TokenStream) -> TokenStream {
    let args = parse_macro_input!(args as ContractAttributes);
    let item = parse_macro_input!(input as Item);
    register_contract(&item, &args)
        .unwrap_or_else(Error::into_compile_error)
        .into()
}

/// Registers a cast from the implementing type to `dyn Trait + Send + Sync`, so instances of the
/// type can be injected where the contract is expected.
#[proc_macro_attribute]
pub fn contract_impl(_args: TokenStream, input: TokenStream) -> TokenStream {
    let item = parse_macro_input!(input as Item);
    register_contract_impl(&item)
        .unwrap_or_else(Error::into_compile_error)
        .into()
}
