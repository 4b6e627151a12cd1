use crate::core::projection::{project, projection_sql};
use crate::domain::model::{Customer, Order, Table, TableRecord};
use crate::domain::ports::{DataSource, Session};
use crate::utils::error::Result;
use async_trait::async_trait;

/// Queries both tables through one warehouse session.
pub struct LiveQueryDataSource<S: Session> {
    session: S,
}

impl<S: Session> LiveQueryDataSource<S> {
    pub fn new(session: S) -> Self {
        Self { session }
    }

    /// Hands the session back so the caller can close it.
    pub fn into_session(self) -> S {
        self.session
    }

    async fn query_table<T: TableRecord>(&self) -> Result<Table<T>> {
        let statement = projection_sql::<T>();
        tracing::debug!("Querying {}: {}", T::RELATION, statement);

        let result = self.session.query(&statement).await?;
        project(result)
    }
}

#[async_trait]
impl<S: Session> DataSource for LiveQueryDataSource<S> {
    fn name(&self) -> &'static str {
        "warehouse"
    }

    async fn fetch_orders(&self) -> Result<Table<Order>> {
        self.query_table().await
    }

    async fn fetch_customers(&self) -> Result<Table<Customer>> {
        self.query_table().await
    }
}
