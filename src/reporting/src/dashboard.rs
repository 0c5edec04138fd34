use std::sync::Arc;

use tracing::error;

use crate::config::ReportingConfig;
use crate::provider::FilterChoices;
use crate::provider::FilterState;
use crate::provider::Heatmap;
use crate::provider::ProductProfitability;
use crate::provider::ProductRow;
use crate::provider::ProductSales;
use crate::provider::RegionMetrics;
use crate::provider::RegionSales;
use crate::provider::RegionalRow;
use crate::provider::SalesProvider;
use crate::provider::Summary;
use crate::provider::TimelinePoint;
use crate::provider_impl::DfProvider;

/// One consistent view of every derived output for the current filter
/// state. Recomputed as a whole on each filter change so reads within a
/// render cycle never mix snapshots.
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    pub choices: FilterChoices,
    pub summary: Summary,
    pub regional_sales: Vec<RegionSales>,
    pub regional_metrics: Vec<RegionMetrics>,
    pub sales_timeline: Vec<TimelinePoint>,
    pub top_products: Vec<ProductSales>,
    pub product_profitability: Vec<ProductProfitability>,
    pub product_region_matrix: Heatmap,
    pub regional_table: Vec<RegionalRow>,
    pub product_table: Vec<ProductRow>,
}

/// The reactive dashboard model: filter state in, memoized snapshot
/// out. A missing connection or a failed query degrades to the empty
/// zero state instead of failing the render.
pub struct Dashboard {
    provider: Option<Arc<dyn SalesProvider>>,
    filters: FilterState,
    snapshot: Snapshot,
}

macro_rules! run_or_empty {
    ($provider:expr, $query:ident, $filters:expr) => {
        match $provider.$query($filters).await {
            Ok(v) => v,
            Err(err) => {
                error!("{} failed: {err}", stringify!($query));
                Default::default()
            }
        }
    };
}

impl Dashboard {
    /// Connects to the warehouse. A failed connection is logged and
    /// yields a dashboard that renders the empty state.
    pub async fn connect(cfg: &ReportingConfig) -> Self {
        let provider: Option<Arc<dyn SalesProvider>> = match DfProvider::try_new(cfg).await {
            Ok(p) => Some(Arc::new(p)),
            Err(err) => {
                error!("failed to connect to warehouse: {err}");
                None
            }
        };

        let mut dashboard = Self {
            provider,
            filters: FilterState::default(),
            snapshot: Snapshot::default(),
        };
        dashboard.recompute().await;
        dashboard
    }

    pub fn with_provider(provider: Arc<dyn SalesProvider>) -> Self {
        Self {
            provider: Some(provider),
            filters: FilterState::default(),
            snapshot: Snapshot::default(),
        }
    }

    pub fn is_connected(&self) -> bool {
        self.provider.is_some()
    }

    pub fn filters(&self) -> &FilterState {
        &self.filters
    }

    /// The current memoized snapshot.
    pub fn snapshot(&self) -> &Snapshot {
        &self.snapshot
    }

    /// Replaces the filter state and recomputes every dependent output
    /// once.
    pub async fn set_filters(&mut self, filters: FilterState) {
        self.filters = filters;
        self.recompute().await;
    }

    pub async fn recompute(&mut self) {
        let provider = match &self.provider {
            Some(p) => p.clone(),
            None => {
                self.snapshot = Snapshot::default();
                return;
            }
        };

        let choices = match provider.filter_choices().await {
            Ok(v) => v,
            Err(err) => {
                error!("filter_choices failed: {err}");
                FilterChoices::default()
            }
        };

        let filters = &self.filters;
        self.snapshot = Snapshot {
            choices,
            summary: run_or_empty!(provider, summary, filters),
            regional_sales: run_or_empty!(provider, regional_sales, filters),
            regional_metrics: run_or_empty!(provider, regional_metrics, filters),
            sales_timeline: run_or_empty!(provider, sales_timeline, filters),
            top_products: run_or_empty!(provider, top_products, filters),
            product_profitability: run_or_empty!(provider, product_profitability, filters),
            product_region_matrix: run_or_empty!(provider, product_region_matrix, filters),
            regional_table: run_or_empty!(provider, regional_table, filters),
            product_table: run_or_empty!(provider, product_table, filters),
        };
    }
}
