use crate::adapters::{LocalStorage, SqlApiSession};
use crate::config::{DashboardSettings, DataMode};
use crate::core::live_source::LiveQueryDataSource;
use crate::core::mock_source::MockFileDataSource;
use crate::domain::model::Datasets;
use crate::domain::ports::DataSource;
use crate::utils::error::Result;

/// Builds the data source for `mode`. In live mode this opens the warehouse
/// session, which the returned source owns for its whole lifetime.
pub async fn select_source(
    mode: DataMode,
    settings: &DashboardSettings,
) -> Result<Box<dyn DataSource>> {
    match mode {
        DataMode::Mock => {
            tracing::info!("🗂️  Using mock data from {}", settings.mock.data_dir);
            let storage = LocalStorage::new(&settings.mock.data_dir);
            Ok(Box::new(MockFileDataSource::new(storage, &settings.mock)))
        }
        DataMode::Live => {
            let connection = settings.resolve_connection()?;
            let session = SqlApiSession::connect(&connection).await?;
            Ok(Box::new(LiveQueryDataSource::new(session)))
        }
    }
}

/// Fetches orders and customers. Any failure fails the call; there is no
/// partial result and no fallback to the other source.
pub async fn fetch_datasets(source: &dyn DataSource) -> Result<Datasets> {
    tracing::info!("📥 Fetching orders and customers from {}", source.name());

    let datasets = source.fetch_datasets().await?;

    tracing::info!(
        "Fetched {} orders and {} customers",
        datasets.orders.len(),
        datasets.customers.len()
    );
    Ok(datasets)
}
