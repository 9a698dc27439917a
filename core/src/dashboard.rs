//! The dashboard: one full recompute per filter change.
//!
//! FLOW (fixed, every render):
//!   1. Warn about selected values outside the filter domain.
//!   2. Load the records passing the selection from the record source.
//!   3. Overview and segment rollups (aggregate metrics engine).
//!   4. Concentration result and Gini band (concentration engine).
//!
//! RULES:
//!   - The record source is opened once at startup and only read.
//!   - The filter domain is loaded once at startup and never changes.
//!   - Nothing derived is cached between renders.
//!   - Reports carry plain numbers; presenters own all formatting.

use crate::{
    concentration::{concentration, ConcentrationResult},
    config::DashboardConfig,
    error::AnalyticsResult,
    filter::{FilterDomain, FilterSelection},
    metrics::{overview, segment_rollup, Overview, SegmentOrder, SegmentRow},
    narrative::GiniBand,
    record::{AccountRecord, Dimension},
    source::{InMemorySource, RecordSource},
    store::AccountStore,
};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardReport {
    pub selection: FilterSelection,
    pub overview: Overview,
    pub risk_segments: Vec<SegmentRow>,
    pub account_type_flows: Vec<SegmentRow>,
    pub region_flows: Vec<SegmentRow>,
    /// `None` when there is not enough data after filtering.
    pub concentration: Option<ConcentrationResult>,
    pub gini_band: GiniBand,
}

impl DashboardReport {
    pub fn gini(&self) -> Option<f64> {
        self.concentration.as_ref().and_then(|c| c.gini)
    }
}

/// A consumer of rendered reports (text tables, JSON, a UI bridge, …).
pub trait Presenter {
    fn name(&self) -> &'static str;

    fn present(&mut self, report: &DashboardReport) -> AnalyticsResult<()>;
}

pub struct Dashboard<S: RecordSource = AccountStore> {
    pub config: DashboardConfig,
    source: S,
    domain: FilterDomain,
}

impl Dashboard<AccountStore> {
    /// Open the configured database read-only and load the filter domain.
    /// An unavailable store is fatal.
    pub fn open(config: DashboardConfig) -> AnalyticsResult<Self> {
        let store = AccountStore::open_read_only(&config.db_path)?;
        Self::with_source(store, config)
    }

    /// Tear down: close the store handle.
    pub fn close(self) -> AnalyticsResult<()> {
        self.source.close()
    }
}

impl Dashboard<InMemorySource> {
    /// Dashboard over a fixed record set (used in tests).
    pub fn in_memory(records: Vec<AccountRecord>) -> AnalyticsResult<Self> {
        Self::with_source(InMemorySource::new(records), DashboardConfig::default_test())
    }
}

impl<S: RecordSource> Dashboard<S> {
    pub fn with_source(source: S, config: DashboardConfig) -> AnalyticsResult<Self> {
        let domain = source.filter_domain()?;
        log::info!(
            "Filter domain from {}: {} risk tiers, {} regions, {} account types",
            source.name(),
            domain.risk_tolerance.len(),
            domain.region.len(),
            domain.account_type.len()
        );
        Ok(Self {
            config,
            source,
            domain,
        })
    }

    pub fn domain(&self) -> &FilterDomain {
        &self.domain
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// The selection a fresh session starts with: everything selected.
    pub fn default_selection(&self) -> FilterSelection {
        self.domain.full_selection()
    }

    pub fn render(&self, selection: &FilterSelection) -> AnalyticsResult<DashboardReport> {
        for (dim, value) in self.domain.unknown_values(selection) {
            log::warn!("{} value '{value}' is not in the filter domain; it matches nothing", dim.label());
        }

        let records = self.source.accounts(selection)?;
        log::debug!("render: {} records pass the selection", records.len());

        let risk_order = SegmentOrder::Domain(self.config.risk_order.clone());
        let concentration = concentration(&records);
        let gini_band = GiniBand::classify(concentration.as_ref().and_then(|c| c.gini));

        if let Some(c) = &concentration {
            log::debug!(
                "render: concentration over {} accounts ({} excluded), gini={:?}",
                c.accounts,
                c.excluded_accounts,
                c.gini
            );
        } else {
            log::debug!("render: not enough data for concentration");
        }

        Ok(DashboardReport {
            selection: selection.clone(),
            overview: overview(&records),
            risk_segments: segment_rollup(&records, Dimension::RiskTolerance, &risk_order),
            account_type_flows: segment_rollup(
                &records,
                Dimension::AccountType,
                &SegmentOrder::NetFlowDesc,
            ),
            region_flows: segment_rollup(&records, Dimension::Region, &SegmentOrder::NetFlowDesc),
            concentration,
            gini_band,
        })
    }

    /// Render and hand the report to a presenter.
    pub fn render_to(
        &self,
        selection: &FilterSelection,
        presenter: &mut dyn Presenter,
    ) -> AnalyticsResult<DashboardReport> {
        let report = self.render(selection)?;
        log::debug!("presenting via {}", presenter.name());
        presenter.present(&report)?;
        Ok(report)
    }
}
