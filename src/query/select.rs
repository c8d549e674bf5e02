use std::fmt::Display;

use sqlx::{Database, QueryBuilder};

use crate::entity::EntityDescriptor;

use super::PushToQuery;

/// A `SELECT` over every internal column of an entity, optionally qualified by a prefix such as
/// a table alias.
///
/// Neither the table nor the column names are quoted.
pub struct Projection<'e, T> {
    entity: &'e EntityDescriptor<T>,
    prefix: &'e str,
}

impl<'e, T> Projection<'e, T> {
    pub(crate) const fn new(entity: &'e EntityDescriptor<T>, prefix: &'e str) -> Self {
        Self { entity, prefix }
    }

    #[must_use]
    pub const fn prefix(&self) -> &str {
        self.prefix
    }

    /// Return the raw SQL of this projection.
    #[must_use]
    pub fn query<DB>(&self) -> String
    where
        DB: Database,
        for<'a> <DB as Database>::Arguments<'a>: Default,
    {
        let mut builder = QueryBuilder::<DB>::new("");
        self.push_to(&mut builder);
        builder.into_sql()
    }
}

impl<T> Display for Projection<'_, T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("SELECT ")?;

        for (i, e) in self.entity.internals().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}{}", self.prefix, e.column_name())?;
        }

        write!(f, " FROM {}", self.entity.table_name())
    }
}

impl<DB, T> PushToQuery<DB> for Projection<'_, T>
where
    DB: Database,
{
    fn push_to(&self, builder: &mut QueryBuilder<'_, DB>) {
        builder.push(self);
    }
}
