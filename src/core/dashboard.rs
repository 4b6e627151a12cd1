use crate::config::PageConfig;
use crate::core::render::{render_html, render_text};
use crate::core::selector::fetch_datasets;
use crate::domain::model::Datasets;
use crate::domain::ports::{DataSource, Storage};
use crate::utils::error::Result;
use crate::utils::monitor::SystemMonitor;

/// What one dashboard refresh produced.
#[derive(Debug)]
pub struct DashboardOutput {
    pub datasets: Datasets,
    pub text: String,
    pub html_path: Option<String>,
}

pub struct DashboardEngine<S: Storage> {
    source: Box<dyn DataSource>,
    storage: S,
    page: PageConfig,
    html_path: Option<String>,
    monitor_enabled: bool,
}

impl<S: Storage> DashboardEngine<S> {
    pub fn new(source: Box<dyn DataSource>, storage: S, page: PageConfig) -> Self {
        Self {
            source,
            storage,
            page,
            html_path: None,
            monitor_enabled: false,
        }
    }

    /// Also render the page as HTML to `path` inside the storage.
    pub fn with_html_output(mut self, path: impl Into<String>) -> Self {
        self.html_path = Some(path.into());
        self
    }

    pub fn with_monitoring(mut self, enabled: bool) -> Self {
        self.monitor_enabled = enabled;
        self
    }

    pub async fn run(&self) -> Result<DashboardOutput> {
        let mut monitor = SystemMonitor::new(self.monitor_enabled);
        monitor.log_stats("Start");

        let datasets = fetch_datasets(self.source.as_ref()).await?;
        monitor.log_stats("Fetch");

        let text = render_text(&self.page, &datasets);

        let html_path = match &self.html_path {
            Some(path) => {
                let html = render_html(&self.page, &datasets, chrono::Utc::now());
                self.storage.write_file(path, html.as_bytes()).await?;
                tracing::info!("📁 Dashboard page saved to: {}", path);
                Some(path.clone())
            }
            None => None,
        };
        monitor.log_stats("Render");

        Ok(DashboardOutput {
            datasets,
            text,
            html_path,
        })
    }
}
