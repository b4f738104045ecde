use crate::item::ContentItem;

/// An immutable, externally ordered list of items plus a forward-only cursor.
///
/// `cursor` always lies in `0..=len`; `cursor == len` means the queue is
/// exhausted. The only way back is [`ContentQueue::rewind`].
#[derive(Debug, Clone)]
pub struct ContentQueue {
    items: Vec<ContentItem>,
    cursor: usize,
}

impl ContentQueue {
    pub fn new(items: Vec<ContentItem>) -> Self {
        Self { items, cursor: 0 }
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn is_exhausted(&self) -> bool {
        self.cursor >= self.items.len()
    }

    pub fn current(&self) -> Option<&ContentItem> {
        self.items.get(self.cursor)
    }

    pub fn items(&self) -> &[ContentItem] {
        &self.items
    }

    /// Items from the cursor onwards, at most `depth` of them.
    pub fn window(&self, depth: usize) -> &[ContentItem] {
        let start = self.cursor.min(self.items.len());
        let end = start.saturating_add(depth).min(self.items.len());
        &self.items[start..end]
    }

    /// Move past the current item. Returns false when already exhausted.
    pub fn advance(&mut self) -> bool {
        if self.is_exhausted() {
            return false;
        }
        self.cursor += 1;
        true
    }

    pub fn rewind(&mut self) {
        self.cursor = 0;
    }
}
