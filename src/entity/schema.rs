use serde::Serialize;

use super::{EntityDescriptor, field::Field};

/// Serializable snapshot of an [`EntityDescriptor`], e.g. for dumping the mapped schema to JSON.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct TableSchema {
    pub name: String,
    pub columns: Vec<ColumnSchema>,
    pub primary_key: Vec<String>,
    pub relations: Vec<RelationSchema>,
}

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct ColumnSchema {
    pub name: String,
    pub member: String,
    pub column_type: String,
    pub nullable: bool,
    pub primary_key: bool,
    pub foreign_key: Option<ForeignKeySchema>,
}

/// An external field, resolved through another table.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct RelationSchema {
    pub member: String,
    pub column_type: String,
    pub nullable: bool,
    pub link: ForeignKeySchema,
}

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct ForeignKeySchema {
    pub assignment_table: Option<String>,
    pub remote_column: Option<String>,
}

impl<T> From<&Field<T>> for ForeignKeySchema {
    fn from(value: &Field<T>) -> Self {
        Self {
            assignment_table: value.assignment_table.clone(),
            remote_column: value.remote_column.clone(),
        }
    }
}

impl<T> From<&Field<T>> for ColumnSchema {
    fn from(value: &Field<T>) -> Self {
        Self {
            name: value.column_name.clone(),
            member: value.member.to_owned(),
            column_type: value.column_type.name().to_owned(),
            nullable: value.nullable,
            primary_key: value.primary_key,
            foreign_key: value.foreign_key.then(|| value.into()),
        }
    }
}

impl<T> From<&Field<T>> for RelationSchema {
    fn from(value: &Field<T>) -> Self {
        Self {
            member: value.member.to_owned(),
            column_type: value.column_type.name().to_owned(),
            nullable: value.nullable,
            link: value.into(),
        }
    }
}

impl<T> From<&EntityDescriptor<T>> for TableSchema {
    fn from(value: &EntityDescriptor<T>) -> Self {
        Self {
            name: value.table_name().to_owned(),
            columns: value.internals().map(ColumnSchema::from).collect(),
            primary_key: value
                .primary_keys()
                .map(|e| e.column_name.clone())
                .collect(),
            relations: value.externals().map(RelationSchema::from).collect(),
        }
    }
}
