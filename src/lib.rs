pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use adapters::{LocalStorage, SqlApiSession};
pub use config::{DashboardSettings, DataMode};
pub use crate::core::{
    dashboard::{DashboardEngine, DashboardOutput},
    live_source::LiveQueryDataSource,
    mock_source::MockFileDataSource,
    selector::{fetch_datasets, select_source},
};
pub use domain::model::{Customer, Datasets, Order, Table};
pub use utils::error::{DashboardError, Result};
