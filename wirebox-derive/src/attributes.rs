use syn::parse::{Parse, ParseStream};
use syn::{Attribute, Error, ExprPath, LitStr, Token};

pub struct FieldAttributes {
    pub name: Option<LitStr>,
    pub default: Option<ExprPath>,
    pub ignore: bool,
}

impl TryFrom<&Attribute> for FieldAttributes {
    type Error = Error;

    fn try_from(value: &Attribute) -> Result<Self, Self::Error> {
        let mut name = None;
        let mut default = None;
        let mut ignore = false;

        value.parse_nested_meta(|meta| {
            if meta.path.is_ident("name") {
                name = Some(meta.value()?.parse()?);
            } else if meta.path.is_ident("default") {
                let expr: LitStr = meta.value()?.parse()?;
                default = Some(expr.parse()?);
            } else if meta.path.is_ident("ignore") {
                ignore = true;
            } else {
                return Err(meta.error("Unsupported inject attribute!"));
            }

            Ok(())
        })?;

        Ok(Self {
            name,
            default,
            ignore,
        })
    }
}

pub struct ConstructibleAttributes {
    pub name: Option<LitStr>,
    pub constructor: Option<ExprPath>,
}

impl TryFrom<&Attribute> for ConstructibleAttributes {
    type Error = Error;

    fn try_from(value: &Attribute) -> Result<Self, Self::Error> {
        let mut name = None;
        let mut constructor = None;

        value.parse_nested_meta(|meta| {
            if meta.path.is_ident("name") {
                name = Some(meta.value()?.parse()?);
            } else if meta.path.is_ident("constructor") {
                let expr: LitStr = meta.value()?.parse()?;
                constructor = Some(expr.parse()?);
            } else {
                return Err(meta.error("Unsupported constructible attribute!"));
            }

            Ok(())
        })?;

        Ok(Self { name, constructor })
    }
}

#[derive(Default)]
pub struct ContractAttributes {
    pub name: Option<LitStr>,
}

impl Parse for ContractAttributes {
    fn parse(input: ParseStream) -> syn::Result<Self> {
        let mut result = Self::default();
        while !input.is_empty() {
            let lookahead = input.lookahead1();
            if lookahead.peek(kw::name) {
                if result.name.is_some() {
                    return Err(Error::new(input.span(), "Name is already defined!"));
                }

                result.name = Some(input.parse::<LitArg<kw::name, LitStr>>()?.value);
            } else if lookahead.peek(Token![,]) {
                let _ = input.parse::<Token![,]>()?;
            } else {
                return Err(lookahead.error());
            }
        }

        Ok(result)
    }
}

struct LitArg<T, A> {
    value: A,
    _p: std::marker::PhantomData<T>,
}

impl<T: Parse, A: Parse> Parse for LitArg<T, A> {
    fn parse(input: ParseStream) -> syn::Result<Self> {
        let _ = input.parse::<T>()?;
        let _ = input.parse::<Token![=]>()?;
        let value = input.parse()?;
        Ok(Self {
            value,
            _p: std::marker::PhantomData,
        })
    }
}

mod kw {
    use syn::custom_keyword;

    custom_keyword!(name);
}
