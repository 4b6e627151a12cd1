use crate::domain::model::{Customer, Datasets, Order, ResultSet, Table};
use crate::utils::error::Result;
use async_trait::async_trait;

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

/// An open connection to the remote warehouse.
#[async_trait]
pub trait Session: Send + Sync {
    /// Runs a read-only statement and returns every row of the result.
    async fn query(&self, statement: &str) -> Result<ResultSet>;
}

/// Where the two dashboard tables come from.
#[async_trait]
pub trait DataSource: Send + Sync {
    fn name(&self) -> &'static str;

    async fn fetch_orders(&self) -> Result<Table<Order>>;

    async fn fetch_customers(&self) -> Result<Table<Customer>>;

    /// Fetches both tables; either both succeed or the call fails.
    async fn fetch_datasets(&self) -> Result<Datasets> {
        let (orders, customers) = tokio::try_join!(self.fetch_orders(), self.fetch_customers())?;
        Ok(Datasets { orders, customers })
    }
}
