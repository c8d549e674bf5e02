use std::any::Any;

use super::{ValueType, marker::Markers};

/// Reads a member's value out of a model instance.
pub type Getter<T> = fn(&T) -> &(dyn Any + 'static);

/// Writes a member's value into a model instance. Hands the value back if it has the wrong type.
pub type Setter<T> = fn(&mut T, Box<dyn Any>) -> Result<(), Box<dyn Any>>;

/// Runtime accessor for one member of `T`.
pub struct MemberHandle<T> {
    get: Getter<T>,
    set: Setter<T>,
}

impl<T> MemberHandle<T> {
    #[must_use]
    pub const fn new(get: Getter<T>, set: Setter<T>) -> Self {
        Self { get, set }
    }

    pub fn get<'m>(&self, model: &'m T) -> &'m (dyn Any + 'static) {
        (self.get)(model)
    }

    /// # Errors
    ///
    /// Returns the value unchanged if it is not of the member's type.
    pub fn set(&self, model: &mut T, value: Box<dyn Any>) -> Result<(), Box<dyn Any>> {
        (self.set)(model, value)
    }
}

// Manual impls: deriving would put a `T: Clone` bound on a pair of function pointers.
impl<T> Clone for MemberHandle<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for MemberHandle<T> {}

impl<T> std::fmt::Debug for MemberHandle<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemberHandle").finish_non_exhaustive()
    }
}

/// What the introspection facility reports about a single member of `T`.
#[derive(Debug, Clone)]
pub struct Member<T> {
    pub(crate) name: &'static str,
    pub(crate) value_type: ValueType,
    pub(crate) collection: bool,
    pub(crate) public: bool,
    pub(crate) handle: MemberHandle<T>,
    pub(crate) markers: Markers,
}

impl<T> Member<T> {
    /// A private, scalar, unmarked member.
    #[must_use]
    pub fn new(name: &'static str, value_type: ValueType, handle: MemberHandle<T>) -> Self {
        Self {
            name,
            value_type,
            collection: false,
            public: false,
            handle,
            markers: Markers::default(),
        }
    }

    /// Whether the member's declared type is a collection (one-to-many or many-to-many shape).
    #[must_use]
    pub fn collection(mut self, collection: bool) -> Self {
        self.collection = collection;
        self
    }

    /// Whether the member can be read from outside the type.
    #[must_use]
    pub fn public(mut self, public: bool) -> Self {
        self.public = public;
        self
    }

    #[must_use]
    pub fn markers(mut self, markers: Markers) -> Self {
        self.markers = markers;
        self
    }

    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    #[must_use]
    pub const fn value_type(&self) -> ValueType {
        self.value_type
    }

    #[must_use]
    pub const fn is_collection(&self) -> bool {
        self.collection
    }

    #[must_use]
    pub const fn is_public(&self) -> bool {
        self.public
    }
}
