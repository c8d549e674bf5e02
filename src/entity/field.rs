use std::any::Any;

use super::{ValueType, member::MemberHandle};
use crate::error::Error;

/// Resolved mapping of a single member of `T` to a column (or a relation) of its table.
///
/// Built by [`EntityDescriptor`](super::EntityDescriptor) and never mutated afterwards.
#[derive(Debug)]
pub struct Field<T> {
    pub(crate) owner: ValueType,
    pub(crate) model: &'static str,
    pub(crate) member: &'static str,
    pub(crate) member_type: ValueType,
    pub(crate) handle: MemberHandle<T>,
    pub(crate) column_name: String,
    pub(crate) column_type: ValueType,
    pub(crate) nullable: bool,
    pub(crate) primary_key: bool,
    pub(crate) foreign_key: bool,
    pub(crate) external: bool,
    pub(crate) assignment_table: Option<String>,
    pub(crate) remote_column: Option<String>,
}

impl<T: 'static> Field<T> {
    pub(crate) fn new(
        model: &'static str,
        member: &'static str,
        member_type: ValueType,
        handle: MemberHandle<T>,
        column_name: String,
        column_type: ValueType,
    ) -> Self {
        Self {
            owner: ValueType::of::<T>(),
            model,
            member,
            member_type,
            handle,
            column_name,
            column_type,
            nullable: false,
            primary_key: false,
            foreign_key: false,
            external: false,
            assignment_table: None,
            remote_column: None,
        }
    }
}

impl<T> Field<T> {
    /// The entity this field belongs to. Identifies the owner without holding on to it.
    #[must_use]
    pub const fn owner(&self) -> ValueType {
        self.owner
    }

    /// The name of the backing member on the model type.
    #[must_use]
    pub const fn member_name(&self) -> &'static str {
        self.member
    }

    /// The declared type of the backing member. Values written through [`Self::set`] must have
    /// this type, regardless of any column type override.
    #[must_use]
    pub const fn member_type(&self) -> ValueType {
        self.member_type
    }

    #[must_use]
    pub const fn handle(&self) -> &MemberHandle<T> {
        &self.handle
    }

    #[must_use]
    pub fn column_name(&self) -> &str {
        &self.column_name
    }

    #[must_use]
    pub const fn column_type(&self) -> ValueType {
        self.column_type
    }

    #[must_use]
    pub const fn is_nullable(&self) -> bool {
        self.nullable
    }

    #[must_use]
    pub const fn is_primary_key(&self) -> bool {
        self.primary_key
    }

    #[must_use]
    pub const fn is_foreign_key(&self) -> bool {
        self.foreign_key
    }

    /// Whether the value is produced by a join against another table rather than stored in a
    /// column of this one.
    #[must_use]
    pub const fn is_external(&self) -> bool {
        self.external
    }

    #[must_use]
    pub fn assignment_table(&self) -> Option<&str> {
        self.assignment_table.as_deref()
    }

    #[must_use]
    pub fn remote_column(&self) -> Option<&str> {
        self.remote_column.as_deref()
    }

    /// Read the live value of this field from `model`.
    pub fn value<'m>(&self, model: &'m T) -> &'m (dyn Any + 'static) {
        self.handle.get(model)
    }

    /// Read the live value of this field from `model`, if it is of type `V`.
    pub fn get<'m, V: Any>(&self, model: &'m T) -> Option<&'m V> {
        self.value(model).downcast_ref()
    }

    /// Write `value` into this field of `model`.
    ///
    /// # Errors
    ///
    /// If `value` does not have the member's type. `model` is left untouched in that case.
    pub fn set_value(&self, model: &mut T, value: Box<dyn Any>) -> Result<(), Error> {
        self.handle
            .set(model, value)
            .map_err(|_| Error::ValueTypeMismatch {
                model: self.model,
                column: self.column_name.clone(),
                expected: self.member_type,
            })
    }

    /// Typed version of [`Self::set_value`].
    ///
    /// # Errors
    ///
    /// If `V` is not the member's type.
    pub fn set<V: Any>(&self, model: &mut T, value: V) -> Result<(), Error> {
        self.set_value(model, Box::new(value))
    }
}
