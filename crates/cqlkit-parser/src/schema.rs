//! Loading the user types of a keyspace from schema rows
//!
//! User types may reference each other in any order inside a keyspace's
//! metadata. Definitions are ordered so that every type is parsed after the
//! types it depends on, which lets most references resolve immediately.
//! Dependencies that are missing from the batch or part of a cycle are
//! parsed as deferred user types and resolve once the registry is complete.

use crate::grammar::{RawType, parse_raw};
use crate::parser::{DataTypeParser, referenced_user_type};
use cqlkit_diagnostics::{CQL0102, CQL0106, CqlError, Result};
use cqlkit_types::{Field, TypeRegistry, UserType, UserTypeLookup};
use indexmap::IndexMap;
use std::collections::VecDeque;
use std::sync::Arc;

/// One user type as stored in the schema tables
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserTypeDefinition {
    /// Type name, exact case, unquoted
    pub name: String,
    /// Field names in declaration order, exact case, unquoted
    pub field_names: Vec<String>,
    /// Field type strings, parallel to `field_names`
    pub field_types: Vec<String>,
}

impl UserTypeDefinition {
    /// Create a definition from `(field name, field type)` pairs
    pub fn new<N, T>(name: impl Into<String>, fields: impl IntoIterator<Item = (N, T)>) -> Self
    where
        N: Into<String>,
        T: Into<String>,
    {
        let (field_names, field_types) = fields
            .into_iter()
            .map(|(name, data_type)| (name.into(), data_type.into()))
            .unzip();
        Self {
            name: name.into(),
            field_names,
            field_types,
        }
    }
}

struct PendingType<'a> {
    definition: &'a UserTypeDefinition,
    field_types: Vec<RawType>,
}

/// Build the registry of `keyspace` from its user type definitions.
///
/// Every loaded type is frozen. Fails on malformed field type strings,
/// mismatched field lists and duplicate names.
pub fn load_user_types(
    keyspace: &str,
    definitions: &[UserTypeDefinition],
) -> Result<Arc<TypeRegistry>> {
    let mut pending = IndexMap::with_capacity(definitions.len());
    for definition in definitions {
        if definition.field_names.len() != definition.field_types.len() {
            return Err(CqlError::schema(
                CQL0106,
                format!(
                    "user type {} has {} field names but {} field types",
                    definition.name,
                    definition.field_names.len(),
                    definition.field_types.len()
                ),
            ));
        }
        if pending.contains_key(&definition.name) {
            return Err(CqlError::schema(
                CQL0102,
                format!("user type {keyspace}.{} is defined more than once", definition.name),
            ));
        }
        let field_types = definition
            .field_types
            .iter()
            .map(|field_type| parse_raw(field_type))
            .collect::<Result<Vec<_>>>()?;
        pending.insert(
            definition.name.clone(),
            PendingType {
                definition,
                field_types,
            },
        );
    }

    let order = dependency_order(&pending);
    log::trace!(
        "loading user types of {keyspace} in order {:?}",
        order
            .iter()
            .filter_map(|&index| pending.get_index(index).map(|(name, _)| name))
            .collect::<Vec<_>>()
    );

    let registry = TypeRegistry::new(keyspace);
    let lookup: Arc<dyn UserTypeLookup> = registry.clone();
    let parser = DataTypeParser::with_registry(lookup);

    for index in order {
        let Some((_, pending_type)) = pending.get_index(index) else {
            continue;
        };
        let definition = pending_type.definition;
        let fields = definition
            .field_names
            .iter()
            .zip(&definition.field_types)
            .zip(&pending_type.field_types)
            .map(|((name, source), raw)| {
                parser
                    .build(raw, source)
                    .map(|data_type| Field::new(name.clone(), data_type))
            })
            .collect::<Result<Vec<_>>>()?;
        registry.register(UserType::new(keyspace, definition.name.clone(), fields, true)?)?;
    }

    Ok(registry)
}

/// Kahn's algorithm over the batch, stable with respect to input order.
///
/// Types left over because of a cycle are appended in input order.
fn dependency_order(pending: &IndexMap<String, PendingType<'_>>) -> Vec<usize> {
    let mut dependents: Vec<Vec<usize>> = vec![Vec::new(); pending.len()];
    let mut in_degree = vec![0usize; pending.len()];

    for (index, pending_type) in pending.values().enumerate() {
        let mut leaves = Vec::new();
        for raw in &pending_type.field_types {
            raw.collect_names(&mut leaves);
        }
        let mut dependencies: Vec<usize> = leaves
            .into_iter()
            .filter_map(referenced_user_type)
            .filter_map(|name| pending.get_index_of(&name))
            .filter(|&dependency| dependency != index)
            .collect();
        dependencies.sort_unstable();
        dependencies.dedup();

        in_degree[index] = dependencies.len();
        for dependency in dependencies {
            dependents[dependency].push(index);
        }
    }

    let mut ready: VecDeque<usize> = (0..pending.len()).filter(|&i| in_degree[i] == 0).collect();
    let mut order = Vec::with_capacity(pending.len());
    while let Some(index) = ready.pop_front() {
        order.push(index);
        for &dependent in &dependents[index] {
            in_degree[dependent] -= 1;
            if in_degree[dependent] == 0 {
                ready.push_back(dependent);
            }
        }
    }

    if order.len() < pending.len() {
        let cyclic: Vec<usize> = (0..pending.len()).filter(|&i| in_degree[i] > 0).collect();
        log::trace!("user types {cyclic:?} form a dependency cycle and will be deferred");
        order.extend(cyclic);
    }
    order
}
