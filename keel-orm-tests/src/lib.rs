//! Model fixtures shared by the integration tests.

use keel_orm::DatabaseModel;

#[derive(DatabaseModel, Default, Debug)]
pub struct Customer {
    #[keel(primary_key, column = "ID")]
    pub id: i32,
    #[keel(column = "NAME")]
    pub name: String,
    #[keel(foreign_key(remote_column = "CUSTOMER_ID"), nullable)]
    pub orders: Vec<Order>,
    #[keel(ignore)]
    pub cached_total: f64,
    #[keel(ignore, column = "SHADOW", primary_key)]
    pub shadow: String,
    internal_note: String,
}

impl Customer {
    #[must_use]
    pub fn internal_note(&self) -> &str {
        &self.internal_note
    }
}

#[derive(DatabaseModel, Default, Debug)]
#[keel(table = "ORDERS")]
pub struct Order {
    #[keel(primary_key)]
    pub id: i64,
    #[keel(foreign_key(remote_column = "ID"), column = "CUSTOMER_ID")]
    pub customer: i32,
    #[keel(column_type = "i64")]
    pub amount_cents: u32,
    #[keel(foreign_key(assignment_table = "ORDER_TAGS", remote_column = "TAG_ID"))]
    pub tags: Vec<Tag>,
}

#[derive(DatabaseModel, Default, Debug)]
#[keel(table = "   ")]
pub struct Tag {
    #[keel(primary_key)]
    pub id: i32,
    pub label: String,
}

#[derive(DatabaseModel, Default, Debug)]
pub struct Instructor {
    #[keel(primary_key)]
    pub id: i32,
    #[keel(foreign_key)]
    pub department: i32,
    #[keel(foreign_key, column = "KINSTRUCTOR")]
    pub classes: Vec<Tag>,
}

/// No markers at all.
#[derive(DatabaseModel, Default, Debug)]
pub struct Note {
    pub title: String,
    pub body: String,
    pub pinned: bool,
    hidden: bool,
}

impl Note {
    #[must_use]
    pub const fn is_hidden(&self) -> bool {
        self.hidden
    }
}

#[derive(DatabaseModel, Default, Debug)]
#[keel(entity)]
pub struct Profile {
    #[keel(primary_key)]
    pub id: i32,
    #[keel(nullable, column = "Email")]
    pub email: Option<String>,
    #[keel(field)]
    pub(crate) rating: u8,
    #[keel(column_type = "i64")]
    pub visits: u32,
    secret: String,
}

impl Profile {
    #[must_use]
    pub const fn rating(&self) -> u8 {
        self.rating
    }

    #[must_use]
    pub fn secret(&self) -> &str {
        &self.secret
    }
}

#[derive(DatabaseModel, Default, Debug)]
pub struct LineItem {
    #[keel(primary_key)]
    pub order_id: i64,
    #[keel(primary_key)]
    pub position: i32,
    pub sku: String,
}

pub mod archive {
    use keel_orm::DatabaseModel;

    #[derive(DatabaseModel, Default, Debug)]
    #[keel(table = "cust_tbl")]
    pub struct Customer {
        #[keel(primary_key, column = "ID")]
        pub id: i32,
        #[keel(column = "NAME")]
        pub name: String,
    }
}
