#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LayoutError {
    /// A `parentId` chain loops back on itself below the root.
    #[error("cycle detected in parent chain at node {node_id:?}")]
    Cycle { node_id: String },
    #[error("root node {root_id:?} not found")]
    RootNotFound { root_id: String },
    #[error("duplicate node id {id:?}")]
    DuplicateId { id: String },
    #[error("no root node designated")]
    NoRoot,
}

impl LayoutError {
    pub fn is_structural(&self) -> bool {
        matches!(self, Self::Cycle { .. })
    }
}
