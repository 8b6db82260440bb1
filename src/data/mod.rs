//! Data layer: scan record types, CSV loading, and column statistics.
//!
//! Architecture:
//! ```text
//!  100shallow.csv / 100med.csv / 100deep.csv
//!        │
//!        ▼
//!   ┌──────────┐
//!   │  loader   │  parse files → ScanSet (missing files skipped)
//!   └──────────┘
//!        │
//!        ▼
//!   ┌──────────────┐
//!   │  ScanDataset  │  Vec<ScanRecord> per ScanType
//!   └──────────────┘
//!        │
//!        ▼
//!   ┌──────────┐
//!   │  stats    │  mean / std / quartiles / frequencies
//!   └──────────┘
//! ```

pub mod loader;
pub mod model;
pub mod stats;
