use std::collections::BTreeMap;

use super::model::{DatasetItem, ParsedItem};

// ---------------------------------------------------------------------------
// Pure item / dataset transforms
// ---------------------------------------------------------------------------

/// Fold `item.values` into a flat `data` mapping. Later duplicate keys
/// overwrite earlier ones. `None` passes through unchanged.
pub fn parse_item(item: Option<&DatasetItem>) -> Option<ParsedItem> {
    let item = item?;

    let data: BTreeMap<_, _> = item
        .values
        .iter()
        .map(|v| (v.key.clone(), v.value.clone()))
        .collect();

    Some(ParsedItem {
        item_type: item.item_type.clone(),
        metadata: item.metadata.clone(),
        data,
    })
}

/// Parse every item in order. `None` passes through unchanged.
pub fn parse_dataset(items: Option<&[DatasetItem]>) -> Option<Vec<ParsedItem>> {
    let items = items?;
    Some(items.iter().filter_map(|it| parse_item(Some(it))).collect())
}
