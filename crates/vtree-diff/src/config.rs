use serde::{Deserialize, Serialize};

/// Configuration for a diff pass.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DiffConfig {
    /// Reject child lists in which two siblings share a key.
    ///
    /// When disabled, duplicate keys are undefined behaviour of the
    /// reconciler: the result is deterministic but not meaningful.
    pub check_duplicate_keys: bool,
    /// When set, a new element carrying a prop with this name keeps its
    /// children untouched: they are not compared at all.
    pub opaque_children_prop: Option<String>,
    /// Skip subtrees whose fingerprints are equal on both sides.
    pub use_fingerprints: bool,
}

impl Default for DiffConfig {
    fn default() -> Self {
        Self {
            check_duplicate_keys: true,
            opaque_children_prop: None,
            use_fingerprints: true,
        }
    }
}

impl DiffConfig {
    /// A configuration that walks every node and trusts its input.
    pub fn exhaustive() -> Self {
        Self {
            check_duplicate_keys: false,
            use_fingerprints: false,
            ..Default::default()
        }
    }

    /// Set the prop that marks an element's children as opaque.
    pub fn with_opaque_children_prop(mut self, prop: impl Into<String>) -> Self {
        self.opaque_children_prop = Some(prop.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let c = DiffConfig::default();
        assert!(c.check_duplicate_keys);
        assert!(c.use_fingerprints);
        assert!(c.opaque_children_prop.is_none());
    }

    #[test]
    fn partial_json_fills_defaults() {
        let c: DiffConfig = serde_json::from_str(r#"{"opaque_children_prop":"ignore"}"#).unwrap();
        assert_eq!(c.opaque_children_prop.as_deref(), Some("ignore"));
        assert!(c.check_duplicate_keys);
    }

    #[test]
    fn exhaustive_disables_shortcuts() {
        let c = DiffConfig::exhaustive().with_opaque_children_prop("ignore");
        assert!(!c.use_fingerprints);
        assert!(!c.check_duplicate_keys);
        assert_eq!(c.opaque_children_prop.as_deref(), Some("ignore"));
    }
}
