use std::fs;
use std::path::Path;
use std::time::Duration;

use dataset_lens::{Dataset, DatasetError, DatasetLoader, DatasetStore};
use serde_json::json;
use tempfile::TempDir;

fn item(concept: &str, title: &str, count: i64) -> serde_json::Value {
    json!({
        "type": "entity",
        "metadata": {},
        "values": [
            { "key": "entityConcept", "value": concept },
            { "key": "entityTitle", "value": title },
            { "key": "count", "value": count }
        ]
    })
}

fn write(dir: &Path, name: &str, doc: &serde_json::Value) {
    fs::write(dir.join(name), serde_json::to_string_pretty(doc).unwrap()).unwrap();
}

fn dataset_dir() -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    write(
        dir.path(),
        "people.json",
        &json!({ "items": [
            item("http://x#Person", "Alice", 5),
            item("http://x#Organization", "Acme", 2),
            item("http://y#Person", "Bob", 1),
        ]}),
    );
    write(
        dir.path(),
        "animals.json",
        &json!([item("http://z#Cat", "Tom", 3), item("http://z#Dog", "Rex", 4)]),
    );
    write(dir.path(), "broken.json", &json!({ "rows": [] }));
    fs::write(dir.path().join("notes.txt"), "not a dataset").unwrap();
    fs::create_dir(dir.path().join("nested.json")).unwrap();
    dir
}

fn full_name(dir: &TempDir, file: &str) -> String {
    dir.path().join(file).to_string_lossy().replace('\\', "/")
}

#[tokio::test(flavor = "current_thread")]
async fn discovers_json_files_in_name_order() {
    let dir = dataset_dir();
    let loader = DatasetLoader::discover(dir.path()).await.unwrap();

    let short: Vec<_> = loader.handles().iter().map(|h| h.short_name()).collect();
    assert_eq!(short, vec!["animals.json", "broken.json", "people.json"]);
    assert!(loader.contains(&full_name(&dir, "people.json")));
}

#[tokio::test(flavor = "current_thread")]
async fn missing_directory_is_an_io_error() {
    let err = DatasetLoader::discover(Path::new("/nonexistent/datasets")).await.unwrap_err();
    assert!(matches!(err, DatasetError::Io { .. }));
}

#[tokio::test(flavor = "current_thread")]
async fn resolve_hands_out_independent_copies() {
    let dir = dataset_dir();
    let loader = DatasetLoader::discover(dir.path()).await.unwrap();
    let name = full_name(&dir, "animals.json");

    let mut first = loader.resolve(&name).await.unwrap();
    if let Dataset::Flat(items) = &mut first {
        items.clear();
    }
    let second = loader.resolve(&name).await.unwrap();
    assert_eq!(second.len(), 2);
}

#[tokio::test(flavor = "current_thread")]
async fn select_filter_and_display() {
    let dir = dataset_dir();
    let mut store = DatasetStore::new(DatasetLoader::discover(dir.path()).await.unwrap());
    let people = full_name(&dir, "people.json");

    store.select_dataset(&people).await.unwrap();
    assert_eq!(
        store.categories().iter().collect::<Vec<_>>(),
        vec!["Organization", "Person"]
    );

    store.select_dataset_filter("Person").unwrap();
    let labels: Vec<_> = store.display_items().into_iter().map(|d| d.label).collect();
    assert_eq!(labels, vec![Some(json!("Alice")), Some(json!("Bob"))]);

    // Substring match: "http://" occurs in every concept.
    store.select_dataset_filter("http://").unwrap();
    assert_eq!(store.filtered_items().len(), 3);

    store.select_dataset_filter("http://").unwrap();
    assert_eq!(store.current_filter(), None);
    assert_eq!(store.filtered_items().len(), 3);
}

#[tokio::test(flavor = "current_thread")]
async fn categories_never_carry_over_between_datasets() {
    let dir = dataset_dir();
    let mut store = DatasetStore::new(DatasetLoader::discover(dir.path()).await.unwrap());

    store.select_dataset(&full_name(&dir, "people.json")).await.unwrap();
    store.select_dataset_filter("Person").unwrap();
    store.select_dataset(&full_name(&dir, "animals.json")).await.unwrap();

    assert_eq!(store.categories().iter().collect::<Vec<_>>(), vec!["Cat", "Dog"]);
    assert_eq!(store.current_filter(), None);
    assert_eq!(store.filtered_items().len(), 2);
}

#[tokio::test(flavor = "current_thread")]
async fn failed_selections_keep_previous_state() {
    let dir = dataset_dir();
    let mut store = DatasetStore::new(DatasetLoader::discover(dir.path()).await.unwrap());
    let people = full_name(&dir, "people.json");

    store.select_dataset(&people).await.unwrap();
    store.select_dataset_filter("Organization").unwrap();
    let before = store.current_dataset().cloned();

    let err = store.select_dataset("missing-handle").await.unwrap_err();
    assert!(matches!(err, DatasetError::UnknownHandle(_)));

    let err = store.select_dataset(&full_name(&dir, "broken.json")).await.unwrap_err();
    assert!(matches!(err, DatasetError::MalformedDataset { .. }), "{err}");

    assert_eq!(store.current_dataset().cloned(), before);
    assert_eq!(store.current_dataset_path(), Some(people.as_str()));
    assert_eq!(store.current_filter(), Some("Organization"));
    assert_eq!(store.filtered_items().len(), 1);
}

#[tokio::test(flavor = "current_thread", start_paused = true)]
async fn slower_load_committed_last_wins() {
    let mut loader = DatasetLoader::new();
    loader
        .register("slow", || async {
            tokio::time::sleep(Duration::from_millis(200)).await;
            Ok(Dataset::Flat(vec![serde_json::from_value(item("http://s#Slow", "s", 1)).unwrap()]))
        })
        .unwrap();
    loader
        .register("fast", || async {
            Ok(Dataset::Flat(vec![serde_json::from_value(item("http://f#Fast", "f", 1)).unwrap()]))
        })
        .unwrap();
    let mut store = DatasetStore::new(loader.clone());

    let slow = tokio::spawn({
        let loader = loader.clone();
        async move { loader.resolve("slow").await }
    });
    let fast = loader.resolve("fast").await.unwrap();
    store.apply_selection("fast", fast).unwrap();

    let slow = slow.await.unwrap().unwrap();
    store.apply_selection("slow", slow).unwrap();

    assert_eq!(store.current_dataset_path(), Some("slow"));
    assert_eq!(store.categories().iter().collect::<Vec<_>>(), vec!["Slow"]);
}
