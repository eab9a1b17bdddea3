//! CQL data types
//!
//! This module defines the complete CQL column type model:
//! - `NativeType` for the fixed set of leaf types
//! - `DataType` as a closed tagged variant over natives, collections,
//!   tuples and user-defined types
//! - Display in the CQL textual form used by schema metadata
//!
//! Equality and hashing are structural. The `frozen` modifier does not take
//! part in either; it only affects how a value is encoded and whether it may
//! nest inside another composite.

use crate::UserType;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::{Hash, Hasher};

/// The fixed set of native CQL types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NativeType {
    Ascii,
    BigInt,
    Blob,
    Boolean,
    Counter,
    Decimal,
    Double,
    Float,
    Inet,
    Int,
    Text,
    Varchar,
    Timestamp,
    Date,
    Time,
    Uuid,
    Varint,
    TimeUuid,
    TinyInt,
    SmallInt,
}

impl NativeType {
    /// Every native type, in declaration order
    pub const ALL: [NativeType; 20] = [
        Self::Ascii,
        Self::BigInt,
        Self::Blob,
        Self::Boolean,
        Self::Counter,
        Self::Decimal,
        Self::Double,
        Self::Float,
        Self::Inet,
        Self::Int,
        Self::Text,
        Self::Varchar,
        Self::Timestamp,
        Self::Date,
        Self::Time,
        Self::Uuid,
        Self::Varint,
        Self::TimeUuid,
        Self::TinyInt,
        Self::SmallInt,
    ];

    /// Get the CQL keyword for this type
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Ascii => "ascii",
            Self::BigInt => "bigint",
            Self::Blob => "blob",
            Self::Boolean => "boolean",
            Self::Counter => "counter",
            Self::Decimal => "decimal",
            Self::Double => "double",
            Self::Float => "float",
            Self::Inet => "inet",
            Self::Int => "int",
            Self::Text => "text",
            Self::Varchar => "varchar",
            Self::Timestamp => "timestamp",
            Self::Date => "date",
            Self::Time => "time",
            Self::Uuid => "uuid",
            Self::Varint => "varint",
            Self::TimeUuid => "timeuuid",
            Self::TinyInt => "tinyint",
            Self::SmallInt => "smallint",
        }
    }

    /// Look up a native type by its CQL keyword, ignoring case
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|native| native.name().eq_ignore_ascii_case(name))
    }

    /// Size of the wire representation, for fixed-width types
    pub const fn fixed_width(&self) -> Option<usize> {
        match self {
            Self::Boolean | Self::TinyInt => Some(1),
            Self::SmallInt => Some(2),
            Self::Int | Self::Float | Self::Date => Some(4),
            Self::BigInt | Self::Counter | Self::Double | Self::Timestamp | Self::Time => Some(8),
            Self::Uuid | Self::TimeUuid => Some(16),
            Self::Ascii
            | Self::Blob
            | Self::Decimal
            | Self::Inet
            | Self::Text
            | Self::Varchar
            | Self::Varint => None,
        }
    }
}

impl fmt::Display for NativeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Kinds of CQL collections
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CollectionKind {
    List,
    Set,
    Map,
}

impl CollectionKind {
    /// Get the CQL keyword for this collection kind
    pub const fn name(&self) -> &'static str {
        match self {
            Self::List => "list",
            Self::Set => "set",
            Self::Map => "map",
        }
    }

    /// Number of type arguments the collection takes
    pub const fn arity(&self) -> usize {
        match self {
            Self::List | Self::Set => 1,
            Self::Map => 2,
        }
    }
}

/// A parametrized collection type
#[derive(Debug, Clone)]
pub struct CollectionType {
    kind: CollectionKind,
    arguments: Vec<DataType>,
    frozen: bool,
}

impl CollectionType {
    /// Get the collection kind
    pub fn kind(&self) -> CollectionKind {
        self.kind
    }

    /// Get the type arguments: one for list and set, key then value for map
    pub fn arguments(&self) -> &[DataType] {
        &self.arguments
    }

    /// Element type of a list or set, key type of a map
    pub fn element_type(&self) -> &DataType {
        &self.arguments[0]
    }

    /// Value type of a map
    pub fn value_type(&self) -> Option<&DataType> {
        self.arguments.get(1)
    }

    /// Check if the collection is frozen
    pub fn is_frozen(&self) -> bool {
        self.frozen
    }
}

impl PartialEq for CollectionType {
    fn eq(&self, other: &Self) -> bool {
        self.kind == other.kind && self.arguments == other.arguments
    }
}

impl Eq for CollectionType {}

impl Hash for CollectionType {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.kind.hash(state);
        self.arguments.hash(state);
    }
}

/// The complete CQL type representation
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum DataType {
    /// A native leaf type
    Native(NativeType),
    /// list, set or map
    Collection(CollectionType),
    /// Anonymous ordered sequence of component types; always frozen
    Tuple(Vec<DataType>),
    /// Named type with ordered fields, scoped to a keyspace
    UserDefined(UserType),
}

impl DataType {
    // === Constructors ===

    pub fn ascii() -> Self {
        Self::Native(NativeType::Ascii)
    }

    pub fn bigint() -> Self {
        Self::Native(NativeType::BigInt)
    }

    pub fn blob() -> Self {
        Self::Native(NativeType::Blob)
    }

    pub fn boolean() -> Self {
        Self::Native(NativeType::Boolean)
    }

    pub fn counter() -> Self {
        Self::Native(NativeType::Counter)
    }

    pub fn decimal() -> Self {
        Self::Native(NativeType::Decimal)
    }

    pub fn double() -> Self {
        Self::Native(NativeType::Double)
    }

    pub fn float() -> Self {
        Self::Native(NativeType::Float)
    }

    pub fn inet() -> Self {
        Self::Native(NativeType::Inet)
    }

    pub fn int() -> Self {
        Self::Native(NativeType::Int)
    }

    pub fn text() -> Self {
        Self::Native(NativeType::Text)
    }

    pub fn varchar() -> Self {
        Self::Native(NativeType::Varchar)
    }

    pub fn timestamp() -> Self {
        Self::Native(NativeType::Timestamp)
    }

    pub fn date() -> Self {
        Self::Native(NativeType::Date)
    }

    pub fn time() -> Self {
        Self::Native(NativeType::Time)
    }

    pub fn uuid() -> Self {
        Self::Native(NativeType::Uuid)
    }

    pub fn varint() -> Self {
        Self::Native(NativeType::Varint)
    }

    pub fn timeuuid() -> Self {
        Self::Native(NativeType::TimeUuid)
    }

    pub fn tinyint() -> Self {
        Self::Native(NativeType::TinyInt)
    }

    pub fn smallint() -> Self {
        Self::Native(NativeType::SmallInt)
    }

    /// Create a list type
    pub fn list(element: DataType) -> Self {
        Self::collection(CollectionKind::List, vec![element], false)
    }

    /// Create a frozen list type
    pub fn frozen_list(element: DataType) -> Self {
        Self::collection(CollectionKind::List, vec![element], true)
    }

    /// Create a set type
    pub fn set(element: DataType) -> Self {
        Self::collection(CollectionKind::Set, vec![element], false)
    }

    /// Create a frozen set type
    pub fn frozen_set(element: DataType) -> Self {
        Self::collection(CollectionKind::Set, vec![element], true)
    }

    /// Create a map type
    pub fn map(key: DataType, value: DataType) -> Self {
        Self::collection(CollectionKind::Map, vec![key, value], false)
    }

    /// Create a frozen map type
    pub fn frozen_map(key: DataType, value: DataType) -> Self {
        Self::collection(CollectionKind::Map, vec![key, value], true)
    }

    /// Create a tuple type
    pub fn tuple(components: Vec<DataType>) -> Self {
        Self::Tuple(components)
    }

    fn collection(kind: CollectionKind, arguments: Vec<DataType>, frozen: bool) -> Self {
        debug_assert_eq!(arguments.len(), kind.arity());
        Self::Collection(CollectionType {
            kind,
            arguments,
            frozen,
        })
    }

    // === Type Properties ===

    /// Get the native kind, for native types
    pub fn native_type(&self) -> Option<NativeType> {
        match self {
            Self::Native(native) => Some(*native),
            _ => None,
        }
    }

    /// Check if this is a native type
    pub fn is_native(&self) -> bool {
        matches!(self, Self::Native(_))
    }

    /// Check if this is a list, set or map
    pub fn is_collection(&self) -> bool {
        matches!(self, Self::Collection(_))
    }

    /// Check if values of this type are serialized as a single unit.
    ///
    /// Tuples are always frozen; natives never are.
    pub fn is_frozen(&self) -> bool {
        match self {
            Self::Native(_) => false,
            Self::Collection(collection) => collection.frozen,
            Self::Tuple(_) => true,
            Self::UserDefined(user_type) => user_type.is_frozen(),
        }
    }

    /// Return a copy with the frozen modifier set.
    ///
    /// Natives are returned unchanged since they cannot be frozen.
    pub fn with_frozen(&self, frozen: bool) -> Self {
        match self {
            Self::Collection(collection) => Self::Collection(CollectionType {
                frozen,
                ..collection.clone()
            }),
            Self::UserDefined(user_type) => Self::UserDefined(user_type.with_frozen(frozen)),
            other => other.clone(),
        }
    }

    /// Type arguments of collections and tuples
    pub fn type_arguments(&self) -> &[DataType] {
        match self {
            Self::Collection(collection) => &collection.arguments,
            Self::Tuple(components) => components,
            Self::Native(_) | Self::UserDefined(_) => &[],
        }
    }

    /// Get the collection description, for collection types
    pub fn as_collection(&self) -> Option<&CollectionType> {
        match self {
            Self::Collection(collection) => Some(collection),
            _ => None,
        }
    }

    /// Get the user type, for user-defined types
    pub fn as_user_type(&self) -> Option<&UserType> {
        match self {
            Self::UserDefined(user_type) => Some(user_type),
            _ => None,
        }
    }

    /// Render the type as it appears in a CREATE TYPE or CREATE TABLE
    /// statement of its own keyspace: user types are not keyspace-qualified.
    ///
    /// The output parses back to an equal type.
    pub fn cql_definition(&self) -> String {
        self.render(false)
    }

    fn render(&self, qualified: bool) -> String {
        let inner = match self {
            Self::Native(native) => return native.name().to_string(),
            Self::Collection(collection) => format!(
                "{}<{}>",
                collection.kind.name(),
                Self::render_arguments(&collection.arguments, qualified)
            ),
            Self::Tuple(components) => {
                format!("tuple<{}>", Self::render_arguments(components, qualified))
            }
            Self::UserDefined(user_type) => {
                if qualified {
                    user_type.qualified_name()
                } else {
                    crate::escape_id(user_type.type_name())
                }
            }
        };

        if self.is_frozen() {
            format!("frozen<{inner}>")
        } else {
            inner
        }
    }

    fn render_arguments(arguments: &[DataType], qualified: bool) -> String {
        arguments
            .iter()
            .map(|argument| argument.render(qualified))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl From<NativeType> for DataType {
    fn from(native: NativeType) -> Self {
        Self::Native(native)
    }
}

impl From<UserType> for DataType {
    fn from(user_type: UserType) -> Self {
        Self::UserDefined(user_type)
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render(true))
    }
}
