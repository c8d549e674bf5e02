pub mod select;

use sqlx::{Database, QueryBuilder};

/// This trait represents anything that can be pushed into a [`QueryBuilder`], i.e. any kind of
/// query fragment.
pub trait PushToQuery<DB>
where
    DB: Database,
{
    /// Push the object's contents into a query builder.
    fn push_to(&self, builder: &mut QueryBuilder<'_, DB>);
}
