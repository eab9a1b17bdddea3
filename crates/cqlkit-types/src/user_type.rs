//! User-defined types
//!
//! A `UserType` is either fully defined (it owns its ordered field list) or
//! deferred: it references a type by `(keyspace, name)` whose definition is
//! looked up in the keyspace registry the first time its structure is
//! queried. The deferred form is what the parser produces for forward
//! references and cycles between user types.
//!
//! Resolution is transparent. Every structural accessor goes through
//! [`UserType::definition`], which resolves at most once per placeholder and
//! then delegates to the resolved definition. A lookup that finds nothing is
//! permanent for that placeholder and surfaces as
//! [`CqlError::UnresolvedType`] from every structural accessor.

use crate::{DataType, UserTypeLookup, escape_id, handle_id};
use cqlkit_diagnostics::{CQL0101, CQL0104, CqlError, Result};
use once_cell::sync::OnceCell;
use std::collections::HashMap;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::{Arc, Weak};

/// A named field of a user type
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Field {
    name: String,
    data_type: DataType,
}

impl Field {
    /// Create a new field. The name is stored as given (already normalized).
    pub fn new(name: impl Into<String>, data_type: DataType) -> Self {
        Self {
            name: name.into(),
            data_type,
        }
    }

    /// Get the field name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get the field type
    pub fn data_type(&self) -> &DataType {
        &self.data_type
    }
}

/// The resolved field list of a user type
#[derive(Debug)]
pub struct UserTypeFields {
    fields: Vec<Field>,
    positions: HashMap<String, usize>,
}

impl UserTypeFields {
    fn new(type_name: &str, fields: Vec<Field>) -> Result<Self> {
        let mut positions = HashMap::with_capacity(fields.len());
        for (index, field) in fields.iter().enumerate() {
            if positions.insert(field.name.clone(), index).is_some() {
                return Err(CqlError::schema(
                    CQL0101,
                    format!("duplicate field '{}' in user type {}", field.name, type_name),
                ));
            }
        }
        Ok(Self { fields, positions })
    }

    /// Get the fields in declaration order
    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    /// Position of a field, with `name` following CQL identifier rules
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.positions.get(&handle_id(name)).copied()
    }
}

#[derive(Clone)]
enum Body {
    Defined(Arc<UserTypeFields>),
    Deferred(Arc<UnresolvedUserType>),
}

/// A user-defined type: a named, ordered field list scoped to a keyspace
#[derive(Clone)]
pub struct UserType {
    keyspace: String,
    type_name: String,
    frozen: bool,
    body: Body,
}

impl UserType {
    /// Create a fully defined user type.
    ///
    /// Fails if two fields share a name.
    pub fn new(
        keyspace: impl Into<String>,
        type_name: impl Into<String>,
        fields: Vec<Field>,
        frozen: bool,
    ) -> Result<Self> {
        let type_name = type_name.into();
        let definition = UserTypeFields::new(&type_name, fields)?;
        Ok(Self {
            keyspace: keyspace.into(),
            type_name,
            frozen,
            body: Body::Defined(Arc::new(definition)),
        })
    }

    /// Create a user type whose fields come from `placeholder` on first use
    pub fn deferred(placeholder: Arc<UnresolvedUserType>, frozen: bool) -> Self {
        Self {
            keyspace: placeholder.keyspace.clone(),
            type_name: placeholder.type_name.clone(),
            frozen,
            body: Body::Deferred(placeholder),
        }
    }

    /// Get the keyspace name
    pub fn keyspace(&self) -> &str {
        &self.keyspace
    }

    /// Get the type name
    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    /// `keyspace.type_name`, each part escaped for CQL
    pub fn qualified_name(&self) -> String {
        format!("{}.{}", escape_id(&self.keyspace), escape_id(&self.type_name))
    }

    /// Check if the type is frozen
    pub fn is_frozen(&self) -> bool {
        self.frozen
    }

    /// Return a copy with the frozen modifier set, sharing the definition
    pub fn with_frozen(&self, frozen: bool) -> Self {
        Self {
            frozen,
            ..self.clone()
        }
    }

    /// Check if this type was created from a forward reference
    pub fn is_deferred(&self) -> bool {
        matches!(self.body, Body::Deferred(_))
    }

    /// Get the field list, resolving a deferred type first
    pub fn definition(&self) -> Result<&UserTypeFields> {
        match &self.body {
            Body::Defined(definition) => Ok(definition),
            Body::Deferred(placeholder) => placeholder.resolve()?.definition(),
        }
    }

    /// Number of fields
    pub fn size(&self) -> Result<usize> {
        Ok(self.definition()?.fields.len())
    }

    /// Check whether the type has a field with the given name
    pub fn contains(&self, name: &str) -> Result<bool> {
        Ok(self.definition()?.index_of(name).is_some())
    }

    /// Get the fields in declaration order
    pub fn fields(&self) -> Result<&[Field]> {
        Ok(self.definition()?.fields())
    }

    /// Get the field names in declaration order
    pub fn field_names(&self) -> Result<Vec<&str>> {
        Ok(self.fields()?.iter().map(Field::name).collect())
    }

    /// Position of the named field
    pub fn index_of(&self, name: &str) -> Result<Option<usize>> {
        Ok(self.definition()?.index_of(name))
    }

    /// Get the type of the named field
    pub fn field_type(&self, name: &str) -> Result<&DataType> {
        let definition = self.definition()?;
        definition
            .index_of(name)
            .map(|index| &definition.fields[index].data_type)
            .ok_or_else(|| {
                CqlError::schema(
                    CQL0104,
                    format!("{} is not a field defined in {}", name, self.qualified_name()),
                )
            })
    }

    /// The CREATE TYPE statement for this type, on a single line
    pub fn as_cql_query(&self) -> Result<String> {
        self.create_statement(false)
    }

    /// The CREATE TYPE statement for this type, one field per line
    pub fn export_as_string(&self) -> Result<String> {
        self.create_statement(true)
    }

    fn create_statement(&self, pretty: bool) -> Result<String> {
        let fields: Vec<String> = self
            .fields()?
            .iter()
            .map(|field| format!("{} {}", escape_id(&field.name), field.data_type.cql_definition()))
            .collect();

        Ok(if pretty {
            format!(
                "CREATE TYPE {} (\n    {}\n);",
                self.qualified_name(),
                fields.join(",\n    ")
            )
        } else {
            format!("CREATE TYPE {} ({});", self.qualified_name(), fields.join(", "))
        })
    }

    /// Structural equality that reports resolution failures.
    ///
    /// Both sides are resolved before comparing; the frozen modifier is
    /// ignored.
    pub fn try_eq(&self, other: &UserType) -> Result<bool> {
        self.eq_within(other, &mut Vec::new())
    }

    /// A pair of definitions met again while still being compared is a
    /// cycle and compares equal.
    fn eq_within(&self, other: &UserType, comparing: &mut Comparing) -> Result<bool> {
        let left = self.definition()?;
        let right = other.definition()?;
        if self.keyspace != other.keyspace || self.type_name != other.type_name {
            return Ok(false);
        }
        let pair = (left as *const UserTypeFields, right as *const UserTypeFields);
        if std::ptr::eq(left, right) || comparing.contains(&pair) {
            return Ok(true);
        }

        comparing.push(pair);
        let equal = fields_eq(&left.fields, &right.fields, comparing);
        comparing.pop();
        equal
    }
}

/// Definitions currently being compared, by address
type Comparing = Vec<(*const UserTypeFields, *const UserTypeFields)>;

fn fields_eq(left: &[Field], right: &[Field], comparing: &mut Comparing) -> Result<bool> {
    if left.len() != right.len() {
        return Ok(false);
    }
    for (l, r) in left.iter().zip(right) {
        if l.name != r.name || !types_eq(&l.data_type, &r.data_type, comparing)? {
            return Ok(false);
        }
    }
    Ok(true)
}

fn types_eq(left: &DataType, right: &DataType, comparing: &mut Comparing) -> Result<bool> {
    match (left, right) {
        (DataType::Native(l), DataType::Native(r)) => Ok(l == r),
        (DataType::Collection(l), DataType::Collection(r)) => {
            Ok(l.kind() == r.kind() && arguments_eq(l.arguments(), r.arguments(), comparing)?)
        }
        (DataType::Tuple(l), DataType::Tuple(r)) => arguments_eq(l, r, comparing),
        (DataType::UserDefined(l), DataType::UserDefined(r)) => l.eq_within(r, comparing),
        _ => Ok(false),
    }
}

fn arguments_eq(left: &[DataType], right: &[DataType], comparing: &mut Comparing) -> Result<bool> {
    if left.len() != right.len() {
        return Ok(false);
    }
    for (l, r) in left.iter().zip(right) {
        if !types_eq(l, r, comparing)? {
            return Ok(false);
        }
    }
    Ok(true)
}

impl PartialEq for UserType {
    /// Falls back to comparing names when either side cannot be resolved.
    fn eq(&self, other: &Self) -> bool {
        self.try_eq(other).unwrap_or_else(|_| {
            self.keyspace == other.keyspace && self.type_name == other.type_name
        })
    }
}

impl Eq for UserType {}

impl Hash for UserType {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.keyspace.hash(state);
        self.type_name.hash(state);
    }
}

impl fmt::Debug for UserType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut debug = f.debug_struct("UserType");
        debug
            .field("keyspace", &self.keyspace)
            .field("type_name", &self.type_name)
            .field("frozen", &self.frozen);
        match &self.body {
            Body::Defined(definition) => debug.field("fields", &definition.fields),
            Body::Deferred(placeholder) => debug.field("state", &placeholder.state()),
        };
        debug.finish()
    }
}

/// Observable resolution state of a placeholder
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolutionState {
    /// No structural query has happened yet, or one is in flight
    Pending,
    /// The registry supplied a definition
    Resolved,
    /// The registry had no definition; this is permanent
    Failed,
}

/// Stand-in for a user type referenced before its definition is registered.
///
/// The first structural query performs the registry lookup; concurrent
/// callers block until it is published and then all observe the same
/// resolved type (or the same failure). The registry is held weakly: a
/// dropped registry snapshot resolves as "absent".
pub struct UnresolvedUserType {
    keyspace: String,
    type_name: String,
    lookup: Weak<dyn UserTypeLookup>,
    resolved: OnceCell<Result<UserType>>,
}

impl UnresolvedUserType {
    /// Create a placeholder for `type_name` in the keyspace served by `lookup`
    pub fn new(lookup: &Arc<dyn UserTypeLookup>, type_name: impl Into<String>) -> Arc<Self> {
        Arc::new(Self {
            keyspace: lookup.keyspace().to_string(),
            type_name: type_name.into(),
            lookup: Arc::downgrade(lookup),
            resolved: OnceCell::new(),
        })
    }

    /// Get the keyspace name
    pub fn keyspace(&self) -> &str {
        &self.keyspace
    }

    /// Get the referenced type name
    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    /// Get the current resolution state without triggering resolution
    pub fn state(&self) -> ResolutionState {
        match self.resolved.get() {
            None => ResolutionState::Pending,
            Some(Ok(_)) => ResolutionState::Resolved,
            Some(Err(_)) => ResolutionState::Failed,
        }
    }

    /// Resolve against the registry, at most once.
    pub fn resolve(&self) -> Result<&UserType> {
        self.resolved
            .get_or_init(|| self.lookup_definition())
            .as_ref()
            .map_err(Clone::clone)
    }

    fn lookup_definition(&self) -> Result<UserType> {
        let found = self
            .lookup
            .upgrade()
            .and_then(|lookup| lookup.user_type(&escape_id(&self.type_name)));

        match found {
            Some(user_type) if !user_type.is_deferred() => {
                log::debug!(
                    "resolved deferred user type {}.{}",
                    self.keyspace,
                    self.type_name
                );
                Ok(user_type)
            }
            _ => {
                log::warn!(
                    "user type {}.{} is not defined in the keyspace metadata",
                    self.keyspace,
                    self.type_name
                );
                Err(CqlError::unresolved_type(&self.keyspace, &self.type_name))
            }
        }
    }
}

impl fmt::Debug for UnresolvedUserType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UnresolvedUserType")
            .field("keyspace", &self.keyspace)
            .field("type_name", &self.type_name)
            .field("state", &self.state())
            .finish()
    }
}
