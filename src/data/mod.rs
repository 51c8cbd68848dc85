/// Data layer: core types, loading, scanning, and reconciliation.
///
/// Architecture:
/// ```text
///   captions.csv            root/<split>/complete/<category>/<id>.pcd
///        │                                │
///        ▼                                ▼
///   ┌──────────┐                    ┌──────────┐
///   │  loader  │  → CaptionTable    │ scanner  │  → Inventory
///   └──────────┘                    └──────────┘
///        │                                │
///        └───────────────┬────────────────┘
///                        ▼
///                 ┌────────────┐
///                 │ reconcile  │  → ReconciliationResult
///                 └────────────┘
/// ```

pub mod loader;
pub mod model;
pub mod reconcile;
pub mod scanner;
