pub mod dashboard;
pub mod live_source;
pub mod mock_source;
pub mod projection;
pub mod render;
pub mod selector;

pub use crate::domain::model::{Customer, Datasets, Order, ResultSet, Table, TableRecord};
pub use crate::domain::ports::{DataSource, Session, Storage};
pub use crate::utils::error::Result;
