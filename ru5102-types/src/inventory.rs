//! Inventory scan results

/// One frame worth of tags reported during an inventory scan
///
/// A scan produces one or more batches; the last one has `scan_finished` set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InventoryBatch {
    /// No further batches follow for this scan
    pub scan_finished: bool,
    
    /// Tag IDs as uppercase hex, in the order the reader reported them
    pub tags: Vec<String>,
}

impl InventoryBatch {
    /// Terminal batch carrying no tags
    pub fn finished() -> Self {
        Self {
            scan_finished: true,
            tags: Vec::new(),
        }
    }
    
    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }
}
