//! The virtual node model.
//!
//! A [`VNode`] is produced fresh on every render and never mutated
//! afterwards. Elements are sealed at construction: their descendant count
//! and [`Fingerprint`] are derived from the children once and stay
//! consistent because the fields are private.

use serde::{Deserialize, Serialize};

use crate::fingerprint::Fingerprint;
use crate::index::PreorderIndex;
use crate::value::{hash_str, Key, Props};

/// A node of a virtual tree.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum VNode {
    /// Literal text content. Serialized as a bare JSON string.
    Text(VText),
    /// A tagged element with props, children and an optional key.
    Element(VElement),
}

/// A text leaf.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VText {
    pub content: String,
}

impl VText {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
        }
    }

    fn fingerprint(&self) -> Fingerprint {
        let mut hasher = blake3::Hasher::new();
        hasher.update(b"vtree.text");
        hash_str(&mut hasher, &self.content);
        Fingerprint::from_hasher(&hasher)
    }
}

/// An element node.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(from = "ElementRepr", into = "ElementRepr")]
pub struct VElement {
    tag: String,
    props: Props,
    children: Vec<VNode>,
    key: Option<Key>,
    /// Number of descendants (not counting self).
    count: usize,
    fingerprint: Fingerprint,
}

impl VElement {
    /// Build an element, deriving its descendant count and fingerprint.
    pub fn new(
        tag: impl Into<String>,
        props: Props,
        children: Vec<VNode>,
        key: Option<Key>,
    ) -> Self {
        let tag = tag.into();
        let count = children.iter().map(|c| 1 + c.count()).sum();

        let mut hasher = blake3::Hasher::new();
        hasher.update(b"vtree.element");
        hash_str(&mut hasher, &tag);
        match &key {
            Some(k) => {
                hasher.update(&[1]);
                k.hash_into(&mut hasher);
            }
            None => {
                hasher.update(&[0]);
            }
        }
        hasher.update(&(props.len() as u64).to_le_bytes());
        for (name, value) in &props {
            hash_str(&mut hasher, name);
            value.hash_into(&mut hasher);
        }
        hasher.update(&(children.len() as u64).to_le_bytes());
        for child in &children {
            hasher.update(child.fingerprint().as_bytes());
        }

        Self {
            tag,
            props,
            children,
            key,
            count,
            fingerprint: Fingerprint::from_hasher(&hasher),
        }
    }

    /// The same element with `key` set.
    pub fn with_key(self, key: impl Into<Key>) -> Self {
        Self::new(self.tag, self.props, self.children, Some(key.into()))
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    pub fn props(&self) -> &Props {
        &self.props
    }

    pub fn children(&self) -> &[VNode] {
        &self.children
    }

    pub fn key(&self) -> Option<&Key> {
        self.key.as_ref()
    }

    /// Total number of descendants.
    pub fn count(&self) -> usize {
        self.count
    }

    pub fn fingerprint(&self) -> Fingerprint {
        self.fingerprint
    }

    /// Whether `other` is the same logical node: equal tags, and equal keys
    /// when both sides define one.
    pub fn same_identity(&self, other: &VElement) -> bool {
        if self.tag != other.tag {
            return false;
        }
        match (&self.key, &other.key) {
            (Some(a), Some(b)) => a == b,
            _ => true,
        }
    }
}

impl PartialEq for VElement {
    fn eq(&self, other: &Self) -> bool {
        self.fingerprint == other.fingerprint
            && self.tag == other.tag
            && self.key == other.key
            && self.props == other.props
            && self.children == other.children
    }
}

#[derive(Serialize, Deserialize)]
struct ElementRepr {
    tag: String,
    #[serde(default, skip_serializing_if = "Props::is_empty")]
    props: Props,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    children: Vec<VNode>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    key: Option<Key>,
}

impl From<ElementRepr> for VElement {
    fn from(repr: ElementRepr) -> Self {
        VElement::new(repr.tag, repr.props, repr.children, repr.key)
    }
}

impl From<VElement> for ElementRepr {
    fn from(el: VElement) -> Self {
        ElementRepr {
            tag: el.tag,
            props: el.props,
            children: el.children,
            key: el.key,
        }
    }
}

impl VNode {
    pub fn is_text(&self) -> bool {
        matches!(self, VNode::Text(_))
    }

    pub fn is_element(&self) -> bool {
        matches!(self, VNode::Element(_))
    }

    pub fn as_element(&self) -> Option<&VElement> {
        match self {
            VNode::Element(el) => Some(el),
            VNode::Text(_) => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            VNode::Text(t) => Some(&t.content),
            VNode::Element(_) => None,
        }
    }

    /// The element key, if any. Text nodes never have one.
    pub fn key(&self) -> Option<&Key> {
        self.as_element().and_then(VElement::key)
    }

    pub fn tag(&self) -> Option<&str> {
        self.as_element().map(VElement::tag)
    }

    /// Children of an element; empty for text.
    pub fn children(&self) -> &[VNode] {
        match self {
            VNode::Element(el) => el.children(),
            VNode::Text(_) => &[],
        }
    }

    /// Number of descendants.
    pub fn count(&self) -> usize {
        match self {
            VNode::Element(el) => el.count,
            VNode::Text(_) => 0,
        }
    }

    pub fn fingerprint(&self) -> Fingerprint {
        match self {
            VNode::Element(el) => el.fingerprint,
            VNode::Text(t) => t.fingerprint(),
        }
    }

    /// A copy of this tree with every key removed.
    ///
    /// Keys are not observable on a host tree, so this is the form to compare
    /// against a host tree read back into virtual nodes.
    pub fn strip_keys(&self) -> VNode {
        match self {
            VNode::Text(t) => VNode::Text(t.clone()),
            VNode::Element(el) => VNode::Element(VElement::new(
                el.tag.clone(),
                el.props.clone(),
                el.children.iter().map(VNode::strip_keys).collect(),
                None,
            )),
        }
    }

    /// Depth-first, self-before-children numbering of this tree.
    pub fn preorder(&self) -> PreorderIndex<&VNode> {
        PreorderIndex::build(self, |node| node.children())
    }
}

impl From<VText> for VNode {
    fn from(t: VText) -> Self {
        VNode::Text(t)
    }
}

impl From<VElement> for VNode {
    fn from(el: VElement) -> Self {
        VNode::Element(el)
    }
}

impl From<&str> for VNode {
    fn from(s: &str) -> Self {
        VNode::Text(VText::new(s))
    }
}

impl From<String> for VNode {
    fn from(s: String) -> Self {
        VNode::Text(VText::new(s))
    }
}

/// Tree construction primitive.
///
/// A `key` prop holding a string or integer is lifted out of the props and
/// becomes the element's key.
pub fn h(tag: impl Into<String>, mut props: Props, children: Vec<VNode>) -> VNode {
    let key = match props.get("key").map(Key::try_from) {
        Some(Ok(key)) => {
            props.remove("key");
            Some(key)
        }
        _ => None,
    };
    VNode::Element(VElement::new(tag, props, children, key))
}

/// A text node.
pub fn text(content: impl Into<String>) -> VNode {
    VNode::Text(VText::new(content))
}
