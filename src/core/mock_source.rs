use crate::config::toml_config::MockConfig;
use crate::core::projection::column_positions;
use crate::domain::model::{Customer, Order, Table, TableRecord};
use crate::domain::ports::{DataSource, Storage};
use crate::utils::error::{DashboardError, Result};
use async_trait::async_trait;

/// Reads both tables from CSV files with header rows.
///
/// Required columns must be present in the header; any other columns are
/// ignored. A missing file or a malformed row fails the whole fetch.
pub struct MockFileDataSource<S: Storage> {
    storage: S,
    orders_file: String,
    customers_file: String,
}

impl<S: Storage> MockFileDataSource<S> {
    pub fn new(storage: S, config: &MockConfig) -> Self {
        Self {
            storage,
            orders_file: config.orders_file.clone(),
            customers_file: config.customers_file.clone(),
        }
    }

    async fn load_table<T: TableRecord>(&self, file: &str) -> Result<Table<T>> {
        tracing::debug!("Reading mock {} from {}", T::RELATION, file);

        let data = self.storage.read_file(file).await.map_err(|e| match e {
            DashboardError::IoError(io) if io.kind() == std::io::ErrorKind::NotFound => {
                DashboardError::MockFileMissing {
                    path: file.to_string(),
                }
            }
            other => other,
        })?;

        parse_csv_table(&data)
    }
}

/// Parses CSV bytes into a typed table, keeping only `T::COLUMNS`.
pub fn parse_csv_table<T: TableRecord>(data: &[u8]) -> Result<Table<T>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_reader(data);

    let headers = reader.headers()?.clone();
    let positions = column_positions::<T, _>(&headers.iter().collect::<Vec<_>>())?;

    let mut rows = Vec::new();
    for record in reader.records() {
        // 欄位數不一致時 csv 會回傳 UnequalLengths
        let record = record?;
        let cells = positions
            .iter()
            .map(|&i| record.get(i).unwrap_or_default().to_string())
            .collect();
        rows.push(T::from_cells(cells));
    }

    Ok(Table::new(rows))
}

#[async_trait]
impl<S: Storage> DataSource for MockFileDataSource<S> {
    fn name(&self) -> &'static str {
        "mock files"
    }

    async fn fetch_orders(&self) -> Result<Table<Order>> {
        self.load_table(&self.orders_file).await
    }

    async fn fetch_customers(&self) -> Result<Table<Customer>> {
        self.load_table(&self.customers_file).await
    }
}
