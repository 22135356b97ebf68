//! GreatSPN log knowledge.
//!
//! GreatSPN has no known log fingerprints for unsupported inputs or
//! memory exhaustion; failed runs stay plain errors.

pub(crate) fn is_not_supported(_log: &str) -> bool {
    false
}

pub(crate) fn is_memory_exhausted(_log: &str) -> bool {
    false
}

pub(crate) fn found_result(log: &str) -> bool {
    log.contains("Showing results for all places:")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_the_places_banner_counts_as_result() {
        assert!(found_result("Showing results for all places:\np0: 0.5\n"));
        assert!(!found_result("RESULT 0.5\n"));
    }
}
