pub mod descriptor;
pub mod field;
pub mod marker;
pub mod member;
pub mod schema;

use std::{
    any::{TypeId, type_name},
    fmt::Display,
    hash::{Hash, Hasher},
};

pub use descriptor::EntityDescriptor;
use marker::EntityMarker;
use member::Member;

use crate::{error::Error, registry};

/// Identifies a Rust type at runtime, along with a human-readable name.
///
/// Used both for the declared type of a member and for the semantic type stored in a column.
#[derive(Debug, Clone, Copy)]
pub struct ValueType {
    id: TypeId,
    name: &'static str,
}

impl ValueType {
    #[must_use]
    pub fn of<T: 'static + ?Sized>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            name: type_name::<T>(),
        }
    }

    #[must_use]
    pub const fn id(&self) -> TypeId {
        self.id
    }

    /// The fully qualified name of the type, as reported by [`std::any::type_name`].
    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    #[must_use]
    pub fn is<T: 'static + ?Sized>(&self) -> bool {
        self.id == TypeId::of::<T>()
    }
}

impl PartialEq for ValueType {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for ValueType {}

impl Hash for ValueType {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl Display for ValueType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// A type that can be described as a database table.
///
/// This is the introspection seam: it reports the type's members in declaration order, together
/// with whatever markers apply to them. Usually implemented via
/// [`DatabaseModel`](crate::DatabaseModel), but any source of markers (configuration, code
/// generation, hand-written tables) works.
pub trait Model: Sized + 'static {
    /// The short name of the modeled type. The default table name is derived from it.
    const NAME: &'static str;

    /// The entity-level marker, if the type carries one.
    fn entity_marker() -> Option<EntityMarker> {
        None
    }

    /// All instance members of the type, public or not, in declaration order.
    fn members() -> Vec<Member<Self>>;

    /// The process-wide descriptor of this type, derived on first use.
    ///
    /// # Errors
    ///
    /// If the type's markers do not describe a self-consistent table. See [`Error`].
    fn entity() -> Result<&'static EntityDescriptor<Self>, Error> {
        registry::describe::<Self>()
    }
}
