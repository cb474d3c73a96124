//! Completion sentinel detection.

/// Literal marker the assistant prints once every requirement passes.
pub const COMPLETION_SENTINEL: &str = "<promise>COMPLETE</promise>";

/// Returns true if the sentinel appears anywhere in `output`.
///
/// Plain substring containment: the marker quoted inside prose still counts.
pub fn contains_sentinel(output: &[u8]) -> bool {
    let needle = COMPLETION_SENTINEL.as_bytes();
    output.windows(needle.len()).any(|window| window == needle)
}
