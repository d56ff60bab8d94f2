//! Typing triggers: the slash command and markdown-style prefixes.

use crate::block::Variant;

/// Prefix markers that convert a block once followed by a space.
const MARKDOWN_SHORTCUTS: &[(&str, Variant)] = &[
    ("#", Variant::Heading1),
    ("##", Variant::Heading2),
    ("###", Variant::Heading3),
    ("-", Variant::BulletItem),
    ("*", Variant::BulletItem),
    ("1.", Variant::NumberedItem),
    ("[]", Variant::TodoItem),
    (">", Variant::Quote),
];

/// The insertion menu opens only when the whole content is a single slash.
pub fn detect_slash_trigger(content: &str) -> bool {
    content == "/"
}

/// Match a completed shortcut marker.
///
/// The content must end with a space and, once trimmed, be exactly one of
/// the markers. Text after the marker means no match.
pub fn detect_markdown_shortcut(content: &str) -> Option<Variant> {
    if !content.ends_with(' ') {
        return None;
    }
    let marker = content.trim();
    MARKDOWN_SHORTCUTS
        .iter()
        .find(|(m, _)| *m == marker)
        .map(|(_, variant)| *variant)
}
