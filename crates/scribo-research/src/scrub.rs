//! Text scrubbing for extracted content.

/// Normalize extracted text before returning it:
/// - trim every line
/// - drop blank lines
/// - collapse runs of spaces/tabs within a line
///
/// Idempotent: scrubbing already-scrubbed text is a no-op.
pub fn scrub_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());

    for line in text.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        if !out.is_empty() {
            out.push('\n');
        }

        let mut last_was_space = false;
        for ch in line.chars() {
            if ch == ' ' || ch == '\t' {
                if !last_was_space {
                    out.push(' ');
                }
                last_was_space = true;
            } else {
                out.push(ch);
                last_was_space = false;
            }
        }
    }

    out
}
