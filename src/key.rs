//! Component key types for the dependency injection container.

use std::any::TypeId;
use std::fmt;
use std::sync::Arc;

/// Key for component storage and lookup.
///
/// Keys uniquely identify one component descriptor within a
/// [`Container`](crate::Container). Two kinds of key are supported and both
/// live in the same registry:
///
/// - **Name**: a string identifier, compared by value
/// - **Marker**: a typed sentinel, compared by `TypeId` identity
///
/// A name key never equals a marker key, even when the marker's type name
/// is spelled the same way.
///
/// # Examples
///
/// ```rust
/// use scoped_di::{Key, key_of_type};
///
/// struct DbKey;
///
/// let by_name = Key::name("Dao");
/// let marker = key_of_type::<DbKey>();
///
/// assert_eq!(by_name, Key::from("Dao"));
/// assert_eq!(marker, Key::of::<DbKey>());
/// assert_ne!(by_name, marker);
/// assert!(marker.display_name().ends_with("DbKey"));
/// ```
#[derive(Debug, Clone)]
pub enum Key {
    /// String identifier key
    ///
    /// Used when the declarative layer names a component, e.g. `"Dao"`.
    Name(Arc<str>),
    /// Typed sentinel key with TypeId and name for diagnostics
    ///
    /// Used when a marker type stands in for a component, e.g. `struct DbKey;`.
    /// Only the TypeId takes part in equality and hashing.
    Marker(TypeId, &'static str),
}

impl Key {
    /// Creates a name key.
    pub fn name(name: impl Into<Arc<str>>) -> Self {
        Key::Name(name.into())
    }

    /// Creates a marker key for the type `T`.
    #[inline]
    pub fn of<T: 'static>() -> Self {
        key_of_type::<T>()
    }

    /// Get the name used in diagnostics and error messages.
    ///
    /// For name keys this is the name itself; for marker keys it is the
    /// `std::any::type_name` of the marker type.
    pub fn display_name(&self) -> &str {
        match self {
            Key::Name(name) => name,
            Key::Marker(_, name) => name,
        }
    }

    /// Returns `true` for string identifier keys.
    pub fn is_name(&self) -> bool {
        matches!(self, Key::Name(_))
    }
}

impl PartialEq for Key {
    #[inline(always)]
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            // TypeId comparison only; the name is diagnostic
            (Key::Marker(a, _), Key::Marker(b, _)) => a == b,
            (Key::Name(a), Key::Name(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for Key {}

impl PartialOrd for Key {
    #[inline(always)]
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Key {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        use std::cmp::Ordering;

        match (self, other) {
            (Key::Marker(a, _), Key::Marker(b, _)) => a.cmp(b),
            (Key::Name(a), Key::Name(b)) => a.cmp(b),
            (Key::Marker(_, _), Key::Name(_)) => Ordering::Less,
            (Key::Name(_), Key::Marker(_, _)) => Ordering::Greater,
        }
    }
}

impl std::hash::Hash for Key {
    #[inline(always)]
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        match self {
            Key::Marker(id, _) => {
                0u8.hash(state); // Discriminant
                id.hash(state);
            }
            Key::Name(name) => {
                1u8.hash(state);
                name.hash(state);
            }
        }
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Key::Name(name) => write!(f, "'{}'", name),
            Key::Marker(_, name) => write!(f, "<{}>", name),
        }
    }
}

impl From<&str> for Key {
    fn from(name: &str) -> Self {
        Key::Name(Arc::from(name))
    }
}

impl From<String> for Key {
    fn from(name: String) -> Self {
        Key::Name(Arc::from(name))
    }
}

impl From<&Key> for Key {
    fn from(key: &Key) -> Self {
        key.clone()
    }
}

// Helper function for creating marker keys
#[inline(always)]
pub fn key_of_type<T: 'static>() -> Key {
    Key::Marker(TypeId::of::<T>(), std::any::type_name::<T>())
}
