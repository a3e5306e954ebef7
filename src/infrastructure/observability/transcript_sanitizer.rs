const MAX_VISIBLE_CHARS: usize = 80;

/// Sanitize journal text for log output.
///
/// Journal entries are personal; logs only ever see a short, single-line
/// excerpt plus the total length, never the full transcript.
pub fn sanitize_transcript(text: &str) -> String {
    let collapsed: String = text.split_whitespace().collect::<Vec<_>>().join(" ");

    if collapsed.is_empty() {
        return String::from("[EMPTY]");
    }

    let total_chars = collapsed.chars().count();
    if total_chars <= MAX_VISIBLE_CHARS {
        return collapsed;
    }

    let visible: String = collapsed.chars().take(MAX_VISIBLE_CHARS).collect();
    format!("{}... ({} chars total)", visible.trim_end(), total_chars)
}
