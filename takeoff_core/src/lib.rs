//! # takeoff_core - Concrete & Rebar Takeoff Engine
//!
//! `takeoff_core` turns component dimensions into material quantities,
//! costs, and sale prices, and accumulates them into a session ledger that
//! exports as CSV. All inputs and outputs are JSON-serializable.
//!
//! ## Design Philosophy
//!
//! - **Stateless**: `calculate` is a pure function of spec and rate table
//! - **JSON-First**: All types implement Serialize/Deserialize
//! - **Rich Errors**: Structured error types, not just strings
//! - **Explicit State**: The ledger is an owned value, never a global
//!
//! ## Quick Start
//!
//! ```rust
//! use takeoff_core::calculations::{calculate, ComponentSpec, ComponentType};
//! use takeoff_core::ledger::ProjectLedger;
//! use takeoff_core::rates::RateTable;
//!
//! let mut ledger = ProjectLedger::new("Smith Residence", "R. Lee");
//!
//! let footing = ComponentSpec::new(ComponentType::SpreadFooting)
//!     .with_label("F-1")
//!     .with_dimensions(3.0, 3.0, 12.0)
//!     .with_quantity(4);
//! let record = calculate(ledger.job(), &footing, RateTable::builtin()).unwrap();
//! ledger.add(record);
//!
//! let csv = takeoff_core::file_io::to_csv_string(&ledger).unwrap();
//! assert!(csv.contains("Spread Footing"));
//! ```
//!
//! ## Modules
//!
//! - [`calculations`] - Component specs, result records, and the estimator
//! - [`ledger`] - Session dataset and summary statistics
//! - [`rates`] - Pricing tables and selections
//! - [`config`] - TOML configuration (defaults and rate overrides)
//! - [`file_io`] - CSV and JSON export with atomic writes
//! - [`units`] - Type-safe unit wrappers
//! - [`errors`] - Structured error types

pub mod calculations;
pub mod config;
pub mod errors;
pub mod file_io;
pub mod ledger;
pub mod rates;
pub mod units;

// Re-export commonly used types at crate root for convenience
pub use calculations::{calculate, ComponentSpec, ComponentType, JobInfo, ResultRecord};
pub use config::TakeoffConfig;
pub use errors::{CalcError, CalcResult};
pub use file_io::{export_csv, save_ledger_json};
pub use ledger::{LedgerSummary, ProjectLedger};
pub use rates::RateTable;
