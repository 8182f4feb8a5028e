use regex::Regex;
use std::collections::BTreeSet;
use std::sync::OnceLock;

fn tag_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"<([^>]+)>").expect("static tag regex"))
}

/// Tokens of a `<a><b><c>` tag string in source order (duplicates kept).
pub fn tag_list(raw: &str) -> Vec<String> {
    if raw.is_empty() {
        return Vec::new();
    }
    tag_re().captures_iter(raw).map(|c| c[1].to_string()).collect()
}

/// Set of tag tokens with angle brackets stripped. Empty input yields the empty set.
pub fn tag_set(raw: &str) -> BTreeSet<String> {
    tag_list(raw).into_iter().collect()
}

/// Comma-joined tags, as emitted in the Topics `<Tags>` field.
pub fn joined_tags(raw: &str) -> String {
    tag_list(raw).join(",")
}
