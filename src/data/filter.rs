use std::collections::BTreeSet;

use log::debug;
use serde_json::Value as JsonValue;

use super::model::{DatasetItem, DisplayItem, ParsedItem, COUNT, ENTITY_CONCEPT, ENTITY_TITLE};
use super::parse::parse_item;
use crate::error::{DatasetError, Result};

// ---------------------------------------------------------------------------
// Concept lookup
// ---------------------------------------------------------------------------

/// The `entityConcept` text of the item at `index`.
///
/// A duplicated key resolves to its last value, as in [`parse_item`].
/// A `null` concept counts as missing; other non-string concepts are
/// compared by their JSON text.
pub fn concept_of(index: usize, item: &DatasetItem) -> Result<String> {
    match item.value(ENTITY_CONCEPT) {
        Some(JsonValue::String(s)) => Ok(s.clone()),
        Some(JsonValue::Null) | None => Err(DatasetError::MissingAttribute {
            index,
            item_type: item.item_type.clone(),
            attribute: ENTITY_CONCEPT.to_string(),
        }),
        Some(other) => Ok(other.to_string()),
    }
}

/// Category of a concept: the text after the last `#`, or the whole concept
/// when it has no fragment.
pub fn category_from_concept(concept: &str) -> &str {
    concept.rsplit('#').next().unwrap_or(concept)
}

/// Category of the item at `index`.
pub fn category_of(index: usize, item: &DatasetItem) -> Result<String> {
    let concept = concept_of(index, item)?;
    Ok(category_from_concept(&concept).to_string())
}

// ---------------------------------------------------------------------------
// Derived views
// ---------------------------------------------------------------------------

/// Distinct categories across all items.
pub fn category_set(items: &[DatasetItem]) -> Result<BTreeSet<String>> {
    let set = items
        .iter()
        .enumerate()
        .map(|(i, item)| category_of(i, item))
        .collect::<Result<BTreeSet<_>>>()?;
    debug!("derived {} categories from {} items", set.len(), items.len());
    Ok(set)
}

/// Indices of items whose concept contains `filter`, in original order.
/// Without a filter every index is returned.
pub fn filtered_indices(items: &[DatasetItem], filter: Option<&str>) -> Result<Vec<usize>> {
    let Some(filter) = filter else {
        return Ok((0..items.len()).collect());
    };

    let mut out = Vec::new();
    for (i, item) in items.iter().enumerate() {
        if concept_of(i, item)?.contains(filter) {
            out.push(i);
        }
    }
    debug!("filter '{filter}' kept {}/{} items", out.len(), items.len());
    Ok(out)
}

/// Project parsed items to `{ label: entityTitle, weight: count }`.
pub fn display_items<'a, I>(items: I) -> Vec<DisplayItem>
where
    I: IntoIterator<Item = &'a DatasetItem>,
{
    items
        .into_iter()
        .filter_map(|item| parse_item(Some(item)))
        .map(to_display)
        .collect()
}

fn to_display(mut item: ParsedItem) -> DisplayItem {
    DisplayItem {
        label: item.data.remove(ENTITY_TITLE),
        weight: item.data.remove(COUNT),
    }
}
