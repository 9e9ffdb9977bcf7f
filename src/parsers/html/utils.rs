/// ASCII whitespace as defined by the HTML standard
pub const WHITESPACES: &[char] = &[' ', '\t', '\n', '\x0c', '\r'];
