pub mod entity;
pub mod error;
pub mod query;
pub mod registry;

/// Derive macro to implement [`Model`](entity::Model) from `#[keel(...)]` markers.
pub use keel_orm_macros::DatabaseModel;

pub use entity::{EntityDescriptor, Model, ValueType, field::Field};
pub use error::Error;

pub use sqlx;
