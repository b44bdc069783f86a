use crate::SelectionEntry;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Run the download pipeline over this snapshot, in order.
    StartBatch { entries: Vec<SelectionEntry> },
}
