//! SDS log knowledge.

const NOT_SUPPORTED_FRAGMENTS: &[&str] = &["IllegalArgumentException"];

const MEMORY_EXHAUSTED_FRAGMENTS: &[&str] = &[
    "NegativeArraySizeException",
    "ArrayIndexOutOfBounds",
    "java.lang.StackOverflowError",
    "java.lang.OutOfMemoryError",
];

pub(crate) fn is_not_supported(log: &str) -> bool {
    NOT_SUPPORTED_FRAGMENTS
        .iter()
        .any(|fragment| log.contains(fragment))
}

pub(crate) fn is_memory_exhausted(log: &str) -> bool {
    MEMORY_EXHAUSTED_FRAGMENTS
        .iter()
        .any(|fragment| log.contains(fragment))
}

/// SDS prints either explicit bounds or a `solve…(` progress marker.
pub(crate) fn found_result(log: &str) -> bool {
    if log.contains("Bounds: ") {
        return true;
    }
    match log.find("solve") {
        Some(pos) => log[pos..].contains('('),
        None => false,
    }
}
