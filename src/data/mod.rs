//! Data layer: core types, loading, filtering, and aggregation.
//!
//! Architecture:
//! ```text
//!  .csv / .json / .parquet
//!        │
//!        ▼
//!   ┌──────────┐
//!   │  loader   │  parse file → SalesDataset
//!   └──────────┘
//!        │
//!        ▼
//!   ┌─────────────┐
//!   │ SalesDataset │  Vec<SalesRecord>, value indexes
//!   └─────────────┘
//!        │
//!        ▼
//!   ┌──────────┐
//!   │  filter   │  apply FilterSpec → FilteredView
//!   └──────────┘
//!        │
//!        ▼
//!   ┌───────────┐
//!   │ aggregate  │  query catalog → DashboardSummary
//!   └───────────┘
//! ```
//!
//! Everything below the loader is total: an empty view flows through the
//! catalog as empty/zero results.

pub mod aggregate;
pub mod filter;
pub mod loader;
pub mod model;
