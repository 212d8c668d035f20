//! Materialize virtual trees as host nodes.

use vtree_types::VNode;

use crate::error::HostResult;
use crate::traits::HostTree;

/// Build a detached host subtree mirroring `vnode`. Keys are not carried
/// over; they exist only on the virtual side.
pub fn render<H: HostTree>(host: &mut H, vnode: &VNode) -> HostResult<H::Node> {
    match vnode {
        VNode::Text(t) => Ok(host.create_text(&t.content)),
        VNode::Element(el) => {
            let node = host.create_element(el.tag());
            for (key, value) in el.props() {
                host.set_attribute(node, key, value)?;
            }
            for child in el.children() {
                let child = render(host, child)?;
                host.append_child(node, child)?;
            }
            Ok(node)
        }
    }
}

/// Render `vnode` and append it under `container`.
pub fn mount<H: HostTree>(host: &mut H, container: H::Node, vnode: &VNode) -> HostResult<H::Node> {
    let node = render(host, vnode)?;
    host.append_child(container, node)?;
    Ok(node)
}
