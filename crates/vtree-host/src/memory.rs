use std::fmt;
use std::fmt::Write as _;

use vtree_types::{PropValue, Props, VElement, VNode, VText};

use crate::error::{HostError, HostResult};
use crate::traits::{HostNodeKind, HostTree};

/// Handle to a node of an [`InMemoryHost`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u32);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug)]
enum NodeData {
    Element {
        tag: String,
        attrs: Props,
        children: Vec<NodeId>,
    },
    Text(String),
    Comment(String),
}

#[derive(Debug)]
struct Slot {
    data: NodeData,
    parent: Option<NodeId>,
}

/// Arena-backed host tree.
///
/// Intended for tests, tooling and headless rendering. Nodes are never
/// freed; detached nodes stay in the arena until the host is dropped.
#[derive(Debug, Default)]
pub struct InMemoryHost {
    slots: Vec<Slot>,
}

impl InMemoryHost {
    /// Create an empty host.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of nodes ever created, attached or not.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Create a detached comment node. Comments are invisible to indexing.
    pub fn create_comment(&mut self, content: &str) -> NodeId {
        self.alloc(NodeData::Comment(content.to_string()))
    }

    /// Tag of an element.
    pub fn tag(&self, node: NodeId) -> HostResult<&str> {
        match &self.slot(node)?.data {
            NodeData::Element { tag, .. } => Ok(tag),
            _ => Err(HostError::NotAnElement(node.to_string())),
        }
    }

    pub fn attribute(&self, node: NodeId, key: &str) -> HostResult<Option<&PropValue>> {
        Ok(self.attrs(node)?.get(key))
    }

    /// Payload of a text or comment node.
    pub fn text(&self, node: NodeId) -> HostResult<&str> {
        match &self.slot(node)?.data {
            NodeData::Text(content) | NodeData::Comment(content) => Ok(content),
            NodeData::Element { .. } => Err(HostError::NotText(node.to_string())),
        }
    }

    /// Serialize the subtree under `node` as markup.
    pub fn to_markup(&self, node: NodeId) -> HostResult<String> {
        let mut out = String::new();
        self.write_markup(node, &mut out)?;
        Ok(out)
    }

    /// Read the subtree under `node` back as a keyless virtual tree.
    ///
    /// Comments are dropped; a comment root yields `None`.
    pub fn to_vnode(&self, node: NodeId) -> HostResult<Option<VNode>> {
        match &self.slot(node)?.data {
            NodeData::Text(content) => Ok(Some(VText::new(content.as_str()).into())),
            NodeData::Comment(_) => Ok(None),
            NodeData::Element {
                tag,
                attrs,
                children,
            } => {
                let mut vchildren = Vec::with_capacity(children.len());
                for child in children {
                    if let Some(vnode) = self.to_vnode(*child)? {
                        vchildren.push(vnode);
                    }
                }
                Ok(Some(
                    VElement::new(tag.as_str(), attrs.clone(), vchildren, None).into(),
                ))
            }
        }
    }

    fn alloc(&mut self, data: NodeData) -> NodeId {
        let id = NodeId(self.slots.len() as u32);
        self.slots.push(Slot { data, parent: None });
        id
    }

    fn slot(&self, node: NodeId) -> HostResult<&Slot> {
        self.slots
            .get(node.0 as usize)
            .ok_or_else(|| HostError::NodeNotFound(node.to_string()))
    }

    fn slot_mut(&mut self, node: NodeId) -> HostResult<&mut Slot> {
        self.slots
            .get_mut(node.0 as usize)
            .ok_or_else(|| HostError::NodeNotFound(node.to_string()))
    }

    fn attrs(&self, node: NodeId) -> HostResult<&Props> {
        match &self.slot(node)?.data {
            NodeData::Element { attrs, .. } => Ok(attrs),
            _ => Err(HostError::NotAnElement(node.to_string())),
        }
    }

    fn attrs_mut(&mut self, node: NodeId) -> HostResult<&mut Props> {
        match &mut self.slot_mut(node)?.data {
            NodeData::Element { attrs, .. } => Ok(attrs),
            _ => Err(HostError::NotAnElement(node.to_string())),
        }
    }

    fn child_list(&self, node: NodeId) -> HostResult<&Vec<NodeId>> {
        match &self.slot(node)?.data {
            NodeData::Element { children, .. } => Ok(children),
            _ => Err(HostError::NotAnElement(node.to_string())),
        }
    }

    fn child_list_mut(&mut self, node: NodeId) -> HostResult<&mut Vec<NodeId>> {
        match &mut self.slot_mut(node)?.data {
            NodeData::Element { children, .. } => Ok(children),
            _ => Err(HostError::NotAnElement(node.to_string())),
        }
    }

    fn position(&self, parent: NodeId, child: NodeId) -> HostResult<usize> {
        self.child_list(parent)?
            .iter()
            .position(|c| *c == child)
            .ok_or_else(|| HostError::NotAChild {
                parent: parent.to_string(),
                child: child.to_string(),
            })
    }

    /// Detach `node` from its current parent, if any.
    fn detach(&mut self, node: NodeId) -> HostResult<()> {
        if let Some(parent) = self.slot(node)?.parent {
            let at = self.position(parent, node)?;
            self.child_list_mut(parent)?.remove(at);
            self.slot_mut(node)?.parent = None;
        }
        Ok(())
    }

    /// Reject attaching `child` under `parent` when `child` is `parent` or
    /// one of its ancestors.
    fn check_attach(&self, parent: NodeId, child: NodeId) -> HostResult<()> {
        self.child_list(parent)?;
        self.slot(child)?;
        let mut cursor = Some(parent);
        while let Some(node) = cursor {
            if node == child {
                return Err(HostError::Cycle {
                    parent: parent.to_string(),
                    child: child.to_string(),
                });
            }
            cursor = self.slot(node)?.parent;
        }
        Ok(())
    }

    fn write_markup(&self, node: NodeId, out: &mut String) -> HostResult<()> {
        match &self.slot(node)?.data {
            NodeData::Text(content) => escape_into(content, false, out),
            NodeData::Comment(content) => {
                let _ = write!(out, "<!--{content}-->");
            }
            NodeData::Element {
                tag,
                attrs,
                children,
            } => {
                out.push('<');
                out.push_str(tag);
                for (key, value) in attrs {
                    let _ = write!(out, " {key}=\"");
                    escape_into(&value.to_string(), true, out);
                    out.push('"');
                }
                out.push('>');
                for child in children {
                    self.write_markup(*child, out)?;
                }
                let _ = write!(out, "</{tag}>");
            }
        }
        Ok(())
    }
}

fn escape_into(raw: &str, attribute: bool, out: &mut String) {
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' if attribute => out.push_str("&quot;"),
            c => out.push(c),
        }
    }
}

impl HostTree for InMemoryHost {
    type Node = NodeId;

    fn create_element(&mut self, tag: &str) -> NodeId {
        self.alloc(NodeData::Element {
            tag: tag.to_string(),
            attrs: Props::new(),
            children: Vec::new(),
        })
    }

    fn create_text(&mut self, content: &str) -> NodeId {
        self.alloc(NodeData::Text(content.to_string()))
    }

    fn set_attribute(&mut self, node: NodeId, key: &str, value: &PropValue) -> HostResult<()> {
        self.attrs_mut(node)?.insert(key.to_string(), value.clone());
        Ok(())
    }

    fn remove_attribute(&mut self, node: NodeId, key: &str) -> HostResult<()> {
        self.attrs_mut(node)?.remove(key);
        Ok(())
    }

    fn set_text(&mut self, node: NodeId, content: &str) -> HostResult<()> {
        match &mut self.slot_mut(node)?.data {
            NodeData::Text(current) => {
                *current = content.to_string();
                Ok(())
            }
            _ => Err(HostError::NotText(node.to_string())),
        }
    }

    fn append_child(&mut self, parent: NodeId, child: NodeId) -> HostResult<()> {
        self.insert_before(parent, child, None)
    }

    fn remove_child(&mut self, parent: NodeId, child: NodeId) -> HostResult<()> {
        let at = self.position(parent, child)?;
        self.child_list_mut(parent)?.remove(at);
        self.slot_mut(child)?.parent = None;
        Ok(())
    }

    fn replace_child(&mut self, parent: NodeId, old: NodeId, new: NodeId) -> HostResult<()> {
        self.position(parent, old)?;
        if old == new {
            return Ok(());
        }
        self.check_attach(parent, new)?;
        self.detach(new)?;
        // Detaching `new` may have shifted `old` within the same parent.
        let at = self.position(parent, old)?;
        self.child_list_mut(parent)?[at] = new;
        self.slot_mut(new)?.parent = Some(parent);
        self.slot_mut(old)?.parent = None;
        Ok(())
    }

    fn insert_before(
        &mut self,
        parent: NodeId,
        node: NodeId,
        reference: Option<NodeId>,
    ) -> HostResult<()> {
        if let Some(reference) = reference {
            self.position(parent, reference)?;
            if reference == node {
                return Ok(());
            }
        }
        self.check_attach(parent, node)?;
        self.detach(node)?;
        let at = match reference {
            Some(reference) => self.position(parent, reference)?,
            None => self.child_list(parent)?.len(),
        };
        self.child_list_mut(parent)?.insert(at, node);
        self.slot_mut(node)?.parent = Some(parent);
        Ok(())
    }

    fn children(&self, node: NodeId) -> HostResult<Vec<NodeId>> {
        match &self.slot(node)?.data {
            NodeData::Element { children, .. } => Ok(children.clone()),
            _ => Ok(Vec::new()),
        }
    }

    fn parent(&self, node: NodeId) -> HostResult<Option<NodeId>> {
        Ok(self.slot(node)?.parent)
    }

    fn node_kind(&self, node: NodeId) -> HostResult<HostNodeKind> {
        Ok(match &self.slot(node)?.data {
            NodeData::Element { .. } => HostNodeKind::Element,
            NodeData::Text(_) => HostNodeKind::Text,
            NodeData::Comment(_) => HostNodeKind::Other,
        })
    }
}
