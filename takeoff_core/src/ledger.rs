//! # Project Ledger
//!
//! The `ProjectLedger` is the session's takeoff dataset: an append-only,
//! ordered list of [`ResultRecord`]s plus the metadata identifying the
//! session. There is no remove or edit; a ledger lives as long as the
//! session that owns it.
//!
//! ## Structure
//!
//! ```text
//! ProjectLedger
//! ├── meta: LedgerMetadata (schema version, job info, session id, timestamps)
//! └── records: Vec<ResultRecord> (in the order they were added)
//! ```
//!
//! ## Example
//!
//! ```rust
//! use takeoff_core::calculations::{calculate, ComponentSpec, ComponentType};
//! use takeoff_core::ledger::ProjectLedger;
//! use takeoff_core::rates::RateTable;
//!
//! let mut ledger = ProjectLedger::new("Smith Residence", "R. Lee");
//! let slab = ComponentSpec::new(ComponentType::InteriorSlab).with_dimensions(30.0, 20.0, 4.0);
//! let record = calculate(ledger.job(), &slab, RateTable::builtin()).unwrap();
//! ledger.add(record);
//!
//! let summary = ledger.summary();
//! assert_eq!(summary.record_count, 1);
//! assert!(summary.margin > 0.0);
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::calculations::{JobInfo, ResultRecord};

/// Current schema version for exported ledger snapshots
pub const SCHEMA_VERSION: &str = "0.1.0";

/// Session-scoped takeoff dataset.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectLedger {
    /// Session metadata
    pub meta: LedgerMetadata,

    /// Calculated line items in insertion order
    records: Vec<ResultRecord>,
}

impl ProjectLedger {
    /// Create a new, empty ledger for a session.
    ///
    /// # Example
    ///
    /// ```rust
    /// use takeoff_core::ledger::ProjectLedger;
    ///
    /// let ledger = ProjectLedger::new("Smith Residence", "R. Lee");
    /// assert!(ledger.is_empty());
    /// assert_eq!(ledger.job().project_name, "Smith Residence");
    /// ```
    pub fn new(project_name: impl Into<String>, estimator_name: impl Into<String>) -> Self {
        let now = Utc::now();
        ProjectLedger {
            meta: LedgerMetadata {
                version: SCHEMA_VERSION.to_string(),
                job: JobInfo::new(project_name, estimator_name),
                session_id: Uuid::new_v4(),
                started: now,
                modified: now,
            },
            records: Vec::new(),
        }
    }

    /// Project and estimator names for this session
    pub fn job(&self) -> &JobInfo {
        &self.meta.job
    }

    /// Append a record to the end of the dataset.
    ///
    /// Records are not deduplicated; adding the same record twice counts it
    /// twice.
    pub fn add(&mut self, record: ResultRecord) {
        info!(
            session = %self.meta.session_id,
            component = %record.component,
            label = %record.label,
            sale_price = record.sale_price,
            "added record to ledger"
        );
        self.records.push(record);
        self.touch();
    }

    /// All records in insertion order
    pub fn records(&self) -> &[ResultRecord] {
        &self.records
    }

    /// Number of records
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Update the modified timestamp.
    fn touch(&mut self) {
        self.meta.modified = Utc::now();
    }

    /// Column-wise totals and margin, summed from full-precision values.
    pub fn summary(&self) -> LedgerSummary {
        let mut summary = self.records.iter().fold(LedgerSummary::default(), |mut acc, r| {
            acc.record_count += 1;
            acc.concrete_cy += r.concrete_cy;
            acc.rebar_lf += r.rebar_lf;
            acc.xps_area_sf += r.xps_area_sf;
            acc.drain_rock_cy += r.drain_rock_cy;
            acc.total_cost += r.total_cost;
            acc.sale_price += r.sale_price;
            acc
        });

        summary.margin = summary.sale_price - summary.total_cost;
        summary.margin_pct = if summary.sale_price == 0.0 {
            0.0
        } else {
            summary.margin / summary.sale_price * 100.0
        };
        summary
    }
}

impl Default for ProjectLedger {
    fn default() -> Self {
        ProjectLedger::new("", "")
    }
}

/// Ledger metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LedgerMetadata {
    /// Schema version of the snapshot format
    pub version: String,

    /// Project and estimator names
    pub job: JobInfo,

    /// Unique id for this session's dataset
    pub session_id: Uuid,

    /// When the session started
    pub started: DateTime<Utc>,

    /// When the last record was added
    pub modified: DateTime<Utc>,
}

/// Aggregate statistics over every record in a ledger.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct LedgerSummary {
    pub record_count: usize,
    pub concrete_cy: f64,
    pub rebar_lf: f64,
    pub xps_area_sf: f64,
    pub drain_rock_cy: f64,
    pub total_cost: f64,
    pub sale_price: f64,
    /// Sale price minus raw cost
    pub margin: f64,
    /// Margin as a percentage of sale price (0 when nothing is sold)
    pub margin_pct: f64,
}
