use derive_more::{Deref, Display};
use std::borrow::Borrow;

/// Opaque name of an abstract contract or a concrete type. Used as the key of bindings and type
/// descriptors.
#[derive(Clone, Default, Debug, Display, Deref, Ord, PartialOrd, Eq, PartialEq, Hash)]
pub struct Identifier(String);

impl Identifier {
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Identifier {
    #[inline]
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for Identifier {
    #[inline]
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&Identifier> for Identifier {
    #[inline]
    fn from(value: &Identifier) -> Self {
        value.clone()
    }
}

impl Borrow<str> for Identifier {
    #[inline]
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for Identifier {
    #[inline]
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl PartialEq<str> for Identifier {
    #[inline]
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for Identifier {
    #[inline]
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

#[cfg(test)]
mod tests {
    use crate::identifier::Identifier;
    use fxhash::FxHashMap;

    #[test]
    fn should_lookup_by_str() {
        let mut map = FxHashMap::default();
        map.insert(Identifier::from("Visit"), 1);

        assert_eq!(map.get("Visit"), Some(&1));
        assert!(map.get("visit").is_none());
    }

    #[test]
    fn should_display_raw_name() {
        assert_eq!(Identifier::from("Train").to_string(), "Train");
        assert_eq!(Identifier::default().as_str(), "");
    }
}
