use serde::{Deserialize, Serialize};

/// Outcome of one sync pass.
///
/// A partially successful pass is representable without an error: actions
/// the server permanently rejected are reported through `warnings` while
/// `updated` reflects that local state changed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncResult {
    /// Whether any local state changed as a result of this pass.
    pub updated: bool,
    /// One human-readable message per item that had to be discarded
    /// because the server permanently rejected it.
    pub warnings: Vec<String>,
}

impl SyncResult {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn merge(&mut self, other: SyncResult) {
        self.updated |= other.updated;
        self.warnings.extend(other.warnings);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merge_accumulates() {
        let mut result = SyncResult::none();
        result.merge(SyncResult {
            updated: false,
            warnings: vec!["a".into()],
        });
        result.merge(SyncResult {
            updated: true,
            warnings: vec![],
        });

        assert!(result.updated);
        assert_eq!(result.warnings, vec!["a".to_string()]);
    }
}
