use super::ValueType;

/// Type-level marker, optionally overriding the table name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EntityMarker {
    pub table_name: Option<String>,
}

impl EntityMarker {
    #[must_use]
    pub fn table(name: impl Into<String>) -> Self {
        Self {
            table_name: Some(name.into()),
        }
    }
}

/// All markers attached to a single member.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Markers {
    /// Exclude the member entirely. Wins over any field marker.
    pub ignore: bool,
    pub field: Option<FieldMarker>,
}

impl Markers {
    #[must_use]
    pub fn ignored() -> Self {
        Self {
            ignore: true,
            field: None,
        }
    }

    #[must_use]
    pub fn field(marker: FieldMarker) -> Self {
        Self {
            ignore: false,
            field: Some(marker),
        }
    }
}

/// Explicit mapping metadata for a member. Unset values fall back to what the member itself
/// reports.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldMarker {
    pub column_name: Option<String>,
    pub column_type: Option<ValueType>,
    pub nullable: bool,
    pub kind: FieldKind,
}

impl FieldMarker {
    #[must_use]
    pub fn primary_key() -> Self {
        Self {
            kind: FieldKind::PrimaryKey,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn foreign_key(link: ForeignKeyMarker) -> Self {
        Self {
            kind: FieldKind::ForeignKey(link),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn column(mut self, name: impl Into<String>) -> Self {
        self.column_name = Some(name.into());
        self
    }

    #[must_use]
    pub fn column_type(mut self, ty: ValueType) -> Self {
        self.column_type = Some(ty);
        self
    }

    #[must_use]
    pub fn nullable(mut self, nullable: bool) -> Self {
        self.nullable = nullable;
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum FieldKind {
    #[default]
    Plain,
    PrimaryKey,
    ForeignKey(ForeignKeyMarker),
}

/// Linkage of a foreign key to another table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ForeignKeyMarker {
    /// The table performing the association, e.g. a join table for many-to-many relations.
    pub assignment_table: Option<String>,
    /// The column on the remote side that this field refers to.
    pub remote_column: Option<String>,
}

impl ForeignKeyMarker {
    #[must_use]
    pub fn new(assignment_table: Option<&str>, remote_column: Option<&str>) -> Self {
        Self {
            assignment_table: assignment_table.map(str::to_owned),
            remote_column: remote_column.map(str::to_owned),
        }
    }
}
