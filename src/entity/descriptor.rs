use itertools::Itertools;
use tracing::{debug, trace};

use super::{
    Model, ValueType,
    field::Field,
    marker::{FieldKind, FieldMarker},
    member::Member,
    schema::TableSchema,
};
use crate::{error::Error, query::select::Projection};

/// Derived table description of a model type `T`.
///
/// All collections are computed once, on construction. `internals` and `externals` partition
/// `fields`; `primary_keys` lists primary key fields in declaration order.
#[derive(Debug)]
pub struct EntityDescriptor<T> {
    table_name: String,
    model: ValueType,
    fields: Vec<Field<T>>,
    internals: Vec<usize>,
    externals: Vec<usize>,
    primary_keys: Vec<usize>,
}

impl<T: Model> EntityDescriptor<T> {
    /// Derive the descriptor of `T` from its members and markers.
    ///
    /// This always derives afresh; use [`Model::entity`] for the cached, process-wide instance.
    ///
    /// # Errors
    ///
    /// If the markers do not describe a self-consistent table, e.g. a collection foreign key
    /// linked through an assignment table without a remote column, or two internal fields
    /// sharing a column name.
    pub fn new() -> Result<Self, Error> {
        let table_name = resolve_table_name::<T>()?;

        let mut fields = Vec::new();
        let mut primary_keys = Vec::new();

        for member in T::members() {
            if member.markers.ignore {
                trace!(model = T::NAME, member = member.name, "skipping ignored member");
                continue;
            }

            let field = match &member.markers.field {
                Some(marker) => marked_field::<T>(&member, marker)?,
                None if member.public => Field::new(
                    T::NAME,
                    member.name,
                    member.value_type,
                    member.handle,
                    member.name.to_owned(),
                    member.value_type,
                ),
                None => {
                    trace!(
                        model = T::NAME,
                        member = member.name,
                        "skipping unmarked member without public read access"
                    );
                    continue;
                }
            };

            if field.primary_key {
                primary_keys.push(fields.len());
            }

            fields.push(field);
        }

        let (externals, internals): (Vec<_>, Vec<_>) =
            (0..fields.len()).partition(|&i| fields[i].external);

        if let Some(column) = internals
            .iter()
            .map(|&i| fields[i].column_name.to_uppercase())
            .duplicates()
            .next()
        {
            return Err(Error::DuplicateColumn {
                model: T::NAME,
                column,
            });
        }

        debug!(
            model = T::NAME,
            table = %table_name,
            fields = fields.len(),
            internals = internals.len(),
            externals = externals.len(),
            primary_keys = primary_keys.len(),
            "derived entity descriptor"
        );

        Ok(Self {
            table_name,
            model: ValueType::of::<T>(),
            fields,
            internals,
            externals,
            primary_keys,
        })
    }
}

/// An explicit, non-blank table name wins; anything else falls back to the upper-cased type name.
fn resolve_table_name<T: Model>() -> Result<String, Error> {
    let table_name = match T::entity_marker().and_then(|e| e.table_name) {
        Some(name) if !name.trim().is_empty() => name,
        _ => T::NAME.to_uppercase(),
    };

    if table_name.is_empty() {
        return Err(Error::EmptyTableName { model: T::NAME });
    }

    Ok(table_name)
}

fn marked_field<T: Model>(member: &Member<T>, marker: &FieldMarker) -> Result<Field<T>, Error> {
    let mut field = Field::new(
        T::NAME,
        member.name,
        member.value_type,
        member.handle,
        marker
            .column_name
            .clone()
            .unwrap_or_else(|| member.name.to_owned()),
        marker.column_type.unwrap_or(member.value_type),
    );

    field.nullable = marker.nullable;

    match &marker.kind {
        FieldKind::Plain => {}
        FieldKind::PrimaryKey => field.primary_key = true,
        FieldKind::ForeignKey(link) => {
            field.foreign_key = true;
            field.external = member.collection;

            // A collection has no local column to join on. One-to-many relations name the remote
            // column through `column_name`, many-to-many ones need `remote_column` for the
            // assignment table.
            let remote_column = link
                .remote_column
                .as_deref()
                .is_some_and(|e| !e.trim().is_empty());
            let column_name = marker
                .column_name
                .as_deref()
                .is_some_and(|e| !e.trim().is_empty());

            if field.external
                && !remote_column
                && (link.assignment_table.is_some() || !column_name)
            {
                return Err(Error::MissingLinkage {
                    model: T::NAME,
                    member: member.name,
                    missing: "remote column",
                });
            }

            field.assignment_table.clone_from(&link.assignment_table);
            field.remote_column.clone_from(&link.remote_column);
        }
    }

    Ok(field)
}

impl<T> EntityDescriptor<T> {
    #[must_use]
    pub fn table_name(&self) -> &str {
        &self.table_name
    }

    /// The modeled type.
    #[must_use]
    pub const fn model(&self) -> ValueType {
        self.model
    }

    /// All fields, in member declaration order.
    #[must_use]
    pub fn fields(&self) -> &[Field<T>] {
        &self.fields
    }

    /// Fields stored as columns of this entity's own table.
    pub fn internals(&self) -> impl ExactSizeIterator<Item = &Field<T>> + '_ {
        self.internals.iter().map(|&i| &self.fields[i])
    }

    /// Fields whose value is produced by a relation to another table.
    pub fn externals(&self) -> impl ExactSizeIterator<Item = &Field<T>> + '_ {
        self.externals.iter().map(|&i| &self.fields[i])
    }

    pub fn primary_keys(&self) -> impl ExactSizeIterator<Item = &Field<T>> + '_ {
        self.primary_keys.iter().map(|&i| &self.fields[i])
    }

    /// Find the internal field stored in `column_name`, ignoring case. External fields have no
    /// column in this table and are never returned.
    #[must_use]
    pub fn field_for_column(&self, column_name: &str) -> Option<&Field<T>> {
        let column_name = column_name.to_uppercase();

        self.internals()
            .find(|e| e.column_name.to_uppercase() == column_name)
    }

    /// Find the field backed by the member called `member_name`.
    #[must_use]
    pub fn field_for_member(&self, member_name: &str) -> Option<&Field<T>> {
        self.fields.iter().find(|e| e.member == member_name)
    }

    /// The `SELECT` statement over all internal fields, each prefixed with `prefix` (trimmed).
    #[must_use]
    pub fn projection<'a>(&'a self, prefix: Option<&'a str>) -> Projection<'a, T> {
        Projection::new(self, prefix.map_or("", str::trim))
    }

    /// Shorthand for rendering [`Self::projection`] to a string.
    ///
    /// Identifiers are emitted verbatim, without quoting or escaping.
    #[must_use]
    pub fn select_sql(&self, prefix: Option<&str>) -> String {
        self.projection(prefix).to_string()
    }

    /// A serializable snapshot of this descriptor.
    #[must_use]
    pub fn schema(&self) -> TableSchema {
        TableSchema::from(self)
    }
}
