//! Known backend collections and the record shapes bound to them.

use serde::Serialize;
use serde::de::DeserializeOwned;
use std::fmt;

/// Collections whose record shape is known at compile time.
///
/// Any other collection name is still reachable through the untyped path
/// ([`crate::infrastructure::pocketbase::PocketBase::untyped`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    Categories,
    Words,
}

impl Collection {
    /// Every known collection, in declaration order.
    pub const ALL: [Collection; 2] = [Collection::Categories, Collection::Words];

    /// Name of the collection in the backend store.
    pub fn name(self) -> &'static str {
        match self {
            Collection::Categories => "categories",
            Collection::Words => "words",
        }
    }

    /// Resolves a collection name. Matching is exact and case-sensitive.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.name() == name)
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A record type stored in one of the known [`Collection`]s.
///
/// Implementors are plain serde shapes: the client never validates or
/// rewrites them, it only (de)serializes the JSON the store returns.
pub trait CollectionRecord: Serialize + DeserializeOwned + Send + Sync + 'static {
    const COLLECTION: Collection;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_name_known() {
        assert_eq!(
            Collection::from_name("categories"),
            Some(Collection::Categories)
        );
        assert_eq!(Collection::from_name("words"), Some(Collection::Words));
    }

    #[test]
    fn test_from_name_unknown() {
        assert_eq!(Collection::from_name("sessions"), None);
        assert_eq!(Collection::from_name("Categories"), None);
        assert_eq!(Collection::from_name(""), None);
    }

    #[test]
    fn test_name_round_trips_for_all() {
        for collection in Collection::ALL {
            assert_eq!(Collection::from_name(collection.name()), Some(collection));
            assert_eq!(collection.to_string(), collection.name());
        }
    }
}
