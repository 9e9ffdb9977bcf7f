use markup5ever_rcdom::Handle;

use super::dom::{find_elements, get_node_attr, text_content};

/// Text of the first `<title>`, trimmed; `None` when there is no title element
pub fn get_title(node: &Handle) -> Option<String> {
    find_elements(node, "title", false)
        .first()
        .map(|title| text_content(title).trim().to_string())
}

/// `content` of the first `<meta name="description">`
pub fn get_description(node: &Handle) -> Option<String> {
    find_elements(node, "meta", false)
        .iter()
        .find(|meta| {
            get_node_attr(meta, "name").is_some_and(|name| name.eq_ignore_ascii_case("description"))
        })
        .and_then(|meta| get_node_attr(meta, "content"))
}
