use std::collections::HashMap;
use std::fmt;
use std::future::Future;
use std::path::{Path, PathBuf};
use std::pin::Pin;
use std::sync::Arc;

use log::{debug, info};

use super::model::Dataset;
use crate::error::{DatasetError, Result};

/// Boxed future produced by a handle's loader.
pub type LoadFuture = Pin<Box<dyn Future<Output = Result<Dataset>> + Send>>;

type LoadFn = Arc<dyn Fn() -> LoadFuture + Send + Sync>;

// ---------------------------------------------------------------------------
// DatasetHandle – a named, lazily resolvable dataset
// ---------------------------------------------------------------------------

#[derive(Clone)]
pub struct DatasetHandle {
    name: String,
    loader: LoadFn,
}

impl DatasetHandle {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Display-friendly name: the last `/`-separated segment.
    pub fn short_name(&self) -> &str {
        short_name(&self.name)
    }
}

impl fmt::Debug for DatasetHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DatasetHandle")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

pub fn short_name(full: &str) -> &str {
    full.rsplit('/').next().unwrap_or(full)
}

// ---------------------------------------------------------------------------
// DatasetLoader – the fixed set of handles
// ---------------------------------------------------------------------------

/// Registry of dataset handles, built once and read-only afterwards.
#[derive(Default, Clone)]
pub struct DatasetLoader {
    handles: Vec<DatasetHandle>,
    index: HashMap<String, usize>,
}

impl DatasetLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register every `*.json` file directly inside `dir`, sorted by file name.
    /// Handles are named `<dir>/<file>.json`.
    pub async fn discover(dir: &Path) -> Result<Self> {
        let io_err = |source| DatasetError::Io {
            path: dir.to_path_buf(),
            source,
        };

        let mut entries = tokio::fs::read_dir(dir).await.map_err(io_err)?;
        let mut files: Vec<PathBuf> = Vec::new();
        while let Some(entry) = entries.next_entry().await.map_err(io_err)? {
            let path = entry.path();
            let is_json = path
                .extension()
                .and_then(|e| e.to_str())
                .is_some_and(|e| e.eq_ignore_ascii_case("json"));
            if is_json && entry.file_type().await.map_err(io_err)?.is_file() {
                files.push(path);
            }
        }
        files.sort();

        let mut loader = Self::new();
        for path in files {
            let name = path.to_string_lossy().replace('\\', "/");
            loader.register_file(name, path)?;
        }
        info!("discovered {} datasets in {}", loader.len(), dir.display());
        Ok(loader)
    }

    /// Register a handle backed by an arbitrary async loader.
    pub fn register<F, Fut>(&mut self, name: impl Into<String>, load: F) -> Result<()>
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Dataset>> + Send + 'static,
    {
        let name = name.into();
        if self.index.contains_key(&name) {
            return Err(DatasetError::DuplicateHandle(name));
        }
        let loader: LoadFn = Arc::new(move || Box::pin(load()) as LoadFuture);
        self.index.insert(name.clone(), self.handles.len());
        self.handles.push(DatasetHandle { name, loader });
        Ok(())
    }

    /// Register a handle that reads and decodes a JSON file on every resolve.
    pub fn register_file(&mut self, name: impl Into<String>, path: PathBuf) -> Result<()> {
        let name = name.into();
        let source_name = name.clone();
        self.register(name, move || {
            let path = path.clone();
            let source_name = source_name.clone();
            async move { load_json_file(&source_name, &path).await }
        })
    }

    /// Register an in-memory dataset; every resolve hands out a fresh copy.
    pub fn register_dataset(&mut self, name: impl Into<String>, dataset: Dataset) -> Result<()> {
        let dataset = Arc::new(dataset);
        self.register(name, move || {
            let dataset = Arc::clone(&dataset);
            async move { Ok(Dataset::clone(&dataset)) }
        })
    }

    /// Handle names in registration order.
    pub fn enumerate(&self) -> Vec<&str> {
        self.handles.iter().map(DatasetHandle::name).collect()
    }

    pub fn handles(&self) -> &[DatasetHandle] {
        &self.handles
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.handles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }

    /// Load the dataset bound to `name`.
    pub async fn resolve(&self, name: &str) -> Result<Dataset> {
        let idx = *self
            .index
            .get(name)
            .ok_or_else(|| DatasetError::UnknownHandle(name.to_string()))?;
        let load = Arc::clone(&self.handles[idx].loader);
        let dataset = load().await?;
        debug!("resolved '{name}' with {} items", dataset.len());
        Ok(dataset)
    }
}

impl fmt::Debug for DatasetLoader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.enumerate()).finish()
    }
}

async fn load_json_file(source_name: &str, path: &Path) -> Result<Dataset> {
    let text = tokio::fs::read_to_string(path)
        .await
        .map_err(|source| DatasetError::Io {
            path: path.to_path_buf(),
            source,
        })?;
    Dataset::from_json_str(source_name, &text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::DatasetItem;

    fn empty() -> Dataset {
        Dataset::Flat(Vec::<DatasetItem>::new())
    }

    #[test]
    fn short_name_is_last_segment() {
        assert_eq!(short_name("./../datasets/people.json"), "people.json");
        assert_eq!(short_name("people.json"), "people.json");
    }

    #[test]
    fn enumerate_keeps_registration_order() {
        let mut loader = DatasetLoader::new();
        loader.register_dataset("b.json", empty()).unwrap();
        loader.register_dataset("a.json", empty()).unwrap();
        assert_eq!(loader.enumerate(), vec!["b.json", "a.json"]);
    }

    #[test]
    fn duplicate_names_are_rejected() {
        let mut loader = DatasetLoader::new();
        loader.register_dataset("a.json", empty()).unwrap();
        let err = loader.register_dataset("a.json", empty()).unwrap_err();
        assert!(matches!(err, DatasetError::DuplicateHandle(n) if n == "a.json"));
        assert_eq!(loader.len(), 1);
    }

    #[tokio::test(flavor = "current_thread")]
    async fn unknown_handle_fails() {
        let loader = DatasetLoader::new();
        let err = loader.resolve("missing-handle").await.unwrap_err();
        assert!(matches!(err, DatasetError::UnknownHandle(n) if n == "missing-handle"));
    }
}
