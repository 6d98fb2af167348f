/// Data layer: dataset types, loading, parsing and derivations.
///
/// Architecture:
/// ```text
///  datasets/*.json
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  name → lazy async load → Dataset
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  parse    │  values[] → flat data map
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  categories, concept filter, display projection
///   └──────────┘
/// ```

pub mod filter;
pub mod loader;
pub mod model;
pub mod parse;
