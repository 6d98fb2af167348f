//! Browse bundled JSON datasets: pick one by name, derive the concept
//! categories it contains and filter its items by category.

pub mod config;
pub mod data;
pub mod error;
pub mod state;
pub mod timing;

pub use data::loader::{DatasetHandle, DatasetLoader};
pub use data::model::{Dataset, DatasetItem, DisplayItem, ParsedItem, ValuePair};
pub use data::parse::{parse_dataset, parse_item};
pub use error::{DatasetError, Result};
pub use state::{DatasetStore, HandleShortName};
