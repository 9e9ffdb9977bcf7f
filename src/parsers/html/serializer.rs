use html5ever::serialize::{serialize, SerializeOpts, TraversalScope};
use markup5ever_rcdom::{Handle, SerializableHandle};

/// Serializes the children of `node` (its "inner HTML")
pub fn serialize_children(node: &Handle) -> String {
    serialize_with_scope(node, TraversalScope::ChildrenOnly(None))
}

/// Serializes `node` itself together with its subtree (its "outer HTML")
pub fn serialize_node(node: &Handle) -> String {
    serialize_with_scope(node, TraversalScope::IncludeNode)
}

fn serialize_with_scope(node: &Handle, traversal_scope: TraversalScope) -> String {
    let mut buf: Vec<u8> = Vec::new();
    let serializable: SerializableHandle = node.clone().into();
    let opts = SerializeOpts {
        traversal_scope,
        ..Default::default()
    };

    if let Err(err) = serialize(&mut buf, &serializable, opts) {
        tracing::warn!("failed to serialize DOM fragment: {}", err);
    }

    String::from_utf8_lossy(&buf).into_owned()
}
