use std::collections::BTreeSet;

use log::{info, warn};
use serde::Serialize;

use crate::data::filter::{category_set, display_items, filtered_indices};
use crate::data::loader::{short_name, DatasetLoader};
use crate::data::model::{Dataset, DatasetItem, DisplayItem};
use crate::error::Result;

// ---------------------------------------------------------------------------
// Dataset store
// ---------------------------------------------------------------------------

/// `{ short, full }` pair for listing dataset handles.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HandleShortName {
    pub short: String,
    pub full: String,
}

/// Selected dataset, active category filter and the views derived from them.
///
/// Derived views are recomputed by [`apply_selection`](Self::apply_selection)
/// and [`select_dataset_filter`](Self::select_dataset_filter), the only two
/// mutators. When no dataset is selected every derived view is empty.
///
/// Overlapping loads: callers that resolve several datasets concurrently and
/// commit each with `apply_selection` get the last *completed* load, not the
/// last requested one. Nothing here guards against that.
#[derive(Debug)]
pub struct DatasetStore {
    loader: DatasetLoader,

    current_dataset_path: Option<String>,
    current_dataset: Option<Dataset>,
    /// Toggle: selecting the active filter again clears it.
    current_filter: Option<String>,

    /// Distinct categories of `current_dataset` (cached).
    categories: BTreeSet<String>,
    /// Indices of items passing `current_filter` (cached).
    visible_indices: Vec<usize>,
}

impl DatasetStore {
    pub fn new(loader: DatasetLoader) -> Self {
        Self {
            loader,
            current_dataset_path: None,
            current_dataset: None,
            current_filter: None,
            categories: BTreeSet::new(),
            visible_indices: Vec::new(),
        }
    }

    pub fn loader(&self) -> &DatasetLoader {
        &self.loader
    }

    pub fn current_dataset_path(&self) -> Option<&str> {
        self.current_dataset_path.as_deref()
    }

    pub fn current_dataset(&self) -> Option<&Dataset> {
        self.current_dataset.as_ref()
    }

    pub fn current_filter(&self) -> Option<&str> {
        self.current_filter.as_deref()
    }

    /// Display-friendly names of every handle, in discovery order.
    pub fn handle_short_names(&self) -> Vec<HandleShortName> {
        self.loader
            .enumerate()
            .into_iter()
            .map(|full| HandleShortName {
                short: short_name(full).to_string(),
                full: full.to_string(),
            })
            .collect()
    }

    /// Resolve `name` and make it the current dataset, clearing any filter.
    /// On failure the store is left exactly as it was.
    pub async fn select_dataset(&mut self, name: &str) -> Result<()> {
        let dataset = match self.loader.resolve(name).await {
            Ok(ds) => ds,
            Err(e) => {
                warn!("selecting dataset '{name}' failed: {e}");
                return Err(e);
            }
        };
        self.apply_selection(name, dataset)
    }

    /// Commit an already resolved dataset under `name`.
    ///
    /// Derivations for the new dataset are computed first, so a dataset whose
    /// items cannot be categorised is rejected without touching the store.
    pub fn apply_selection(&mut self, name: &str, dataset: Dataset) -> Result<()> {
        let (categories, visible_indices) = match derive_views(&dataset) {
            Ok(d) => d,
            Err(e) => {
                warn!("rejecting dataset '{name}': {e}");
                return Err(e);
            }
        };

        info!(
            "selected dataset '{name}': {} items, {} categories",
            dataset.len(),
            categories.len()
        );
        self.current_filter = None;
        self.current_dataset_path = Some(name.to_string());
        self.current_dataset = Some(dataset);
        self.categories = categories;
        self.visible_indices = visible_indices;
        Ok(())
    }

    /// Toggle `category` as the active filter. Unknown categories are allowed
    /// and simply match nothing.
    pub fn select_dataset_filter(&mut self, category: &str) -> Result<()> {
        let next = if self.current_filter.as_deref() == Some(category) {
            None
        } else {
            Some(category.to_string())
        };

        let visible_indices = match &self.current_dataset {
            Some(ds) => filtered_indices(ds.items(), next.as_deref())?,
            None => Vec::new(),
        };

        self.current_filter = next;
        self.visible_indices = visible_indices;
        Ok(())
    }

    /// Distinct categories of the current dataset.
    pub fn categories(&self) -> &BTreeSet<String> {
        &self.categories
    }

    /// Raw items passing the active filter, in dataset order.
    pub fn filtered_items(&self) -> Vec<&DatasetItem> {
        let Some(ds) = &self.current_dataset else {
            return Vec::new();
        };
        let items = ds.items();
        self.visible_indices.iter().map(|&i| &items[i]).collect()
    }

    /// `filtered_items` projected to `{ label, weight }`.
    pub fn display_items(&self) -> Vec<DisplayItem> {
        display_items(self.filtered_items())
    }
}

fn derive_views(dataset: &Dataset) -> Result<(BTreeSet<String>, Vec<usize>)> {
    let categories = category_set(dataset.items())?;
    let visible = filtered_indices(dataset.items(), None)?;
    Ok((categories, visible))
}
