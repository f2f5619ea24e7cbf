/// Emphasis marker the captioning model wraps field names in.
const BOLD_MARKER: &str = "**";

/// Canonical form of a description or query used for matching and embedding.
///
/// Strips `**` markers, collapses every whitespace run (newlines included)
/// into one space, trims the ends and lower-cases. Idempotent.
pub fn normalize(text: &str) -> String {
    // A single left-to-right pass never leaves an adjacent "**" behind.
    let stripped = text.replace(BOLD_MARKER, "");
    let collapsed = stripped.split_whitespace().collect::<Vec<_>>().join(" ");
    collapsed.to_lowercase()
}
