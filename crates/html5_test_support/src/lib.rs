//! Test helpers shared by the tokenizer's integration tests, benches and
//! fuzz target: a recording sink with a stable line format, chunk plans for
//! streaming parity, and failure diffs.

pub mod chunks;
pub mod recording;

pub use chunks::{
    BoundaryPolicy, ChunkPlan, LcgRng, build_chunk_plans, default_chunk_plans, fuzz_chunk_plans,
};
pub use recording::{RecordingSink, run_borrowed, run_chunked, run_shared, run_shared_chunked};

/// Header value identifying the token snapshot line format.
pub const TOKEN_FORMAT_V1: &str = "h5stream-token-v1";

pub fn escape_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            ch if ch < ' ' || ch == '\u{7f}' => {
                use std::fmt::Write;
                let _ = write!(&mut out, "\\u{{{:02X}}}", ch as u32);
            }
            _ => out.push(ch),
        }
    }
    out
}

pub fn diff_lines(expected: &[String], actual: &[String]) -> String {
    use std::fmt::Write;

    let max = expected.len().max(actual.len());
    let missing = "<missing>";
    let mut out = String::new();
    let mismatch = (0..max).find(|&i| {
        expected.get(i).map(String::as_str).unwrap_or(missing)
            != actual.get(i).map(String::as_str).unwrap_or(missing)
    });
    if let Some(i) = mismatch {
        let start = i.saturating_sub(2);
        let end = (i + 3).min(max);
        let _ = writeln!(
            &mut out,
            "first mismatch at line {} (showing {}..={}):",
            i + 1,
            start + 1,
            end
        );
        for line_idx in start..end {
            let left = expected
                .get(line_idx)
                .map(String::as_str)
                .unwrap_or(missing);
            let right = actual.get(line_idx).map(String::as_str).unwrap_or(missing);
            let marker = if line_idx == i { ">" } else { " " };
            let _ = writeln!(&mut out, "{marker} {:>4}  expected: {left}", line_idx + 1);
            let _ = writeln!(&mut out, "{marker} {:>4}    actual: {right}", line_idx + 1);
        }
    }
    let _ = writeln!(
        &mut out,
        "expected {} lines, actual {} lines",
        expected.len(),
        actual.len()
    );
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escape_text_escapes_controls_and_quotes() {
        assert_eq!(escape_text("a\"b\\\n\u{1}"), "a\\\"b\\\\\\n\\u{01}");
    }

    #[test]
    fn diff_lines_points_at_first_mismatch() {
        let expected = vec!["EOF".to_string()];
        let actual = vec!["CHAR text=\"x\"".to_string(), "EOF".to_string()];
        let diff = diff_lines(&expected, &actual);
        assert!(diff.starts_with("first mismatch at line 1"), "{diff}");
        assert!(diff.contains("expected 1 lines, actual 2 lines"), "{diff}");
    }
}
