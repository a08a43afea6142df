use std::sync::Arc;

use crate::models::ReportSummary;
use crate::store::DataStore;

/// Stored reports listed on the reports page. Fetched once; `refresh`
/// re-queries on demand instead of on every render.
pub struct ReportIndex {
    store: Arc<dyn DataStore>,
    reports: Vec<ReportSummary>,
    loaded: bool,
}

impl ReportIndex {
    pub fn new(store: Arc<dyn DataStore>) -> Self {
        Self {
            store,
            reports: Vec::new(),
            loaded: false,
        }
    }

    pub async fn load(&mut self) -> &[ReportSummary] {
        if !self.loaded {
            self.refresh().await;
        }
        &self.reports
    }

    pub async fn refresh(&mut self) -> &[ReportSummary] {
        self.reports = self.store.list_reports().await.unwrap_or_else(|e| {
            tracing::error!(error = %e, "error fetching reports");
            Vec::new()
        });
        self.loaded = true;
        &self.reports
    }
}
