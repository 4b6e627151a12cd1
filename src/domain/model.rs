use serde::{Deserialize, Serialize};

/// A row type with a fixed column projection on a named relation.
///
/// `COLUMNS` is both the SQL projection issued in live mode and the set of
/// header names a mock CSV file must contain.
pub trait TableRecord: Sized + Send {
    const RELATION: &'static str;
    const COLUMNS: &'static [&'static str];

    /// Builds a record from cells ordered like `COLUMNS`.
    fn from_cells(cells: Vec<String>) -> Self;

    /// Cell values ordered like `COLUMNS`, for rendering.
    fn cells(&self) -> Vec<&str>;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    pub order_number: String,
    pub order_name: String,
}

impl TableRecord for Order {
    const RELATION: &'static str = "orders";
    const COLUMNS: &'static [&'static str] = &["order_number", "order_name"];

    fn from_cells(cells: Vec<String>) -> Self {
        let mut cells = cells.into_iter();
        Self {
            order_number: cells.next().unwrap_or_default(),
            order_name: cells.next().unwrap_or_default(),
        }
    }

    fn cells(&self) -> Vec<&str> {
        vec![self.order_number.as_str(), self.order_name.as_str()]
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Customer {
    pub customer_id: String,
    pub customer_name: String,
    pub email: String,
}

impl TableRecord for Customer {
    const RELATION: &'static str = "customers";
    const COLUMNS: &'static [&'static str] = &["customer_id", "customer_name", "email"];

    fn from_cells(cells: Vec<String>) -> Self {
        let mut cells = cells.into_iter();
        Self {
            customer_id: cells.next().unwrap_or_default(),
            customer_name: cells.next().unwrap_or_default(),
            email: cells.next().unwrap_or_default(),
        }
    }

    fn cells(&self) -> Vec<&str> {
        vec![
            self.customer_id.as_str(),
            self.customer_name.as_str(),
            self.email.as_str(),
        ]
    }
}

/// A fully materialized, read-only table. Rows keep the source order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Table<T> {
    rows: Vec<T>,
}

impl<T: TableRecord> Table<T> {
    pub fn new(rows: Vec<T>) -> Self {
        Self { rows }
    }

    pub fn relation(&self) -> &'static str {
        T::RELATION
    }

    pub fn columns(&self) -> &'static [&'static str] {
        T::COLUMNS
    }

    pub fn rows(&self) -> &[T] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Both tables of one dashboard refresh.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Datasets {
    pub orders: Table<Order>,
    pub customers: Table<Customer>,
}

/// Untyped query result as a warehouse session returns it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResultSet {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Option<String>>>,
}
