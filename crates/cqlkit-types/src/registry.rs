//! Keyspace-scoped user type registry
//!
//! A `TypeRegistry` is one snapshot of the user types defined in a keyspace.
//! It is populated while schema metadata is loaded and replaced as a whole
//! when the schema changes; existing entries are never edited in place.

use crate::{UserType, handle_id};
use cqlkit_diagnostics::{CQL0102, CQL0103, CQL0105, CqlError, Result};
use indexmap::IndexMap;
use parking_lot::RwLock;
use std::sync::Arc;

/// Source of user type definitions for deferred resolution
pub trait UserTypeLookup: Send + Sync {
    /// Keyspace the lookup serves
    fn keyspace(&self) -> &str;

    /// Find a user type by name, following CQL identifier rules
    fn user_type(&self, name: &str) -> Option<UserType>;
}

/// Registry of the user types of one keyspace
#[derive(Debug)]
pub struct TypeRegistry {
    keyspace: String,
    types: RwLock<IndexMap<String, UserType>>,
}

impl TypeRegistry {
    /// Create an empty registry for a keyspace
    pub fn new(keyspace: impl Into<String>) -> Arc<Self> {
        Arc::new(Self {
            keyspace: keyspace.into(),
            types: RwLock::new(IndexMap::new()),
        })
    }

    /// Get the keyspace name
    pub fn keyspace(&self) -> &str {
        &self.keyspace
    }

    /// Add a fully defined user type.
    ///
    /// Fails if the type belongs to another keyspace, is itself deferred, or
    /// a type with the same name is already registered.
    pub fn register(&self, user_type: UserType) -> Result<()> {
        if user_type.keyspace() != self.keyspace {
            return Err(CqlError::schema(
                CQL0103,
                format!(
                    "user type {} does not belong to keyspace {}",
                    user_type.qualified_name(),
                    self.keyspace
                ),
            ));
        }
        if user_type.is_deferred() {
            return Err(CqlError::schema(
                CQL0105,
                format!("cannot register deferred user type {}", user_type.qualified_name()),
            ));
        }

        let mut types = self.types.write();
        if types.contains_key(user_type.type_name()) {
            return Err(CqlError::schema(
                CQL0102,
                format!("user type {} is already defined", user_type.qualified_name()),
            ));
        }
        types.insert(user_type.type_name().to_string(), user_type);
        Ok(())
    }

    /// Find a user type by name; quoted names keep their case
    pub fn get(&self, name: &str) -> Option<UserType> {
        self.types.read().get(&handle_id(name)).cloned()
    }

    /// Check whether a type with this name is registered
    pub fn contains(&self, name: &str) -> bool {
        self.types.read().contains_key(&handle_id(name))
    }

    /// All registered types, in registration order
    pub fn user_types(&self) -> Vec<UserType> {
        self.types.read().values().cloned().collect()
    }

    /// Number of registered types
    pub fn len(&self) -> usize {
        self.types.read().len()
    }

    /// Check if no type is registered
    pub fn is_empty(&self) -> bool {
        self.types.read().is_empty()
    }
}

impl UserTypeLookup for TypeRegistry {
    fn keyspace(&self) -> &str {
        &self.keyspace
    }

    fn user_type(&self, name: &str) -> Option<UserType> {
        self.get(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{DataType, Field, UnresolvedUserType};

    fn point(keyspace: &str, name: &str) -> UserType {
        UserType::new(
            keyspace,
            name,
            vec![Field::new("x", DataType::double()), Field::new("y", DataType::double())],
            true,
        )
        .unwrap()
    }

    #[test]
    fn test_register_and_get() {
        let registry = TypeRegistry::new("ks");
        registry.register(point("ks", "point")).unwrap();
        registry.register(point("ks", "Point3D")).unwrap();

        assert_eq!(registry.len(), 2);
        assert!(registry.contains("POINT"));
        assert!(registry.get("\"Point3D\"").is_some());
        assert!(registry.get("point3d").is_none());
        let names: Vec<String> = registry
            .user_types()
            .iter()
            .map(|t| t.type_name().to_string())
            .collect();
        assert_eq!(names, vec!["point", "Point3D"]);
    }

    #[test]
    fn test_register_rejects_inconsistent_types() {
        let registry = TypeRegistry::new("ks");
        registry.register(point("ks", "point")).unwrap();

        assert_eq!(registry.register(point("ks", "point")).unwrap_err().code(), CQL0102);
        assert_eq!(registry.register(point("other", "p")).unwrap_err().code(), CQL0103);

        let lookup: Arc<dyn UserTypeLookup> = registry.clone();
        let deferred = UserType::deferred(UnresolvedUserType::new(&lookup, "later"), true);
        assert_eq!(registry.register(deferred).unwrap_err().code(), CQL0105);
    }
}
