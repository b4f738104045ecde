use std::collections::HashSet;
use std::path::Path;

use anyhow::{Context, Result, bail};
use sift_core::ContentItem;

/// Read a deck file: a JSON array of content items, in display order.
pub fn load_deck(path: &Path) -> Result<Vec<ContentItem>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read deck file {}", path.display()))?;
    let items: Vec<ContentItem> = serde_json::from_str(&content)
        .with_context(|| format!("failed to parse deck file {}", path.display()))?;
    validate_deck(&items)?;
    Ok(items)
}

/// Ids must be present and unique; ordering is the caller's business.
pub fn validate_deck(items: &[ContentItem]) -> Result<()> {
    let mut seen = HashSet::new();
    for (index, item) in items.iter().enumerate() {
        if item.id.trim().is_empty() {
            bail!("item at index {index} has an empty id");
        }
        if !seen.insert(item.id.as_str()) {
            bail!("duplicate item id {:?} at index {index}", item.id);
        }
    }
    Ok(())
}
