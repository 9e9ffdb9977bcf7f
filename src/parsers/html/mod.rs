//! HTML parsing and rewriting
//!
//! - `utils`: shared constants
//! - `parser`: `srcset` parsing
//! - `dom`: DOM queries and mutation helpers
//! - `metadata`: title and description extraction
//! - `serializer`: inner/outer HTML serialization
//! - `walker`: the body rewrite passes

pub mod dom;
pub mod metadata;
pub mod parser;
pub mod serializer;
pub mod utils;
pub mod walker;

pub use dom::{
    ancestors, create_html_element, find_elements, find_elements_with_attr,
    get_child_node_by_name, get_node_attr, get_node_name, get_parent_node, html_to_dom,
    map_child_text, map_descendant_text, replace_node, set_node_attr, text_content,
    walk_elements,
};
pub use metadata::{get_description, get_title};
pub use parser::{parse_srcset, rewrite_srcset, SrcSetItem};
pub use serializer::{serialize_children, serialize_node};
pub use utils::WHITESPACES;
pub use walker::{walk, RewriteContext};
