//! Fuzzy suggestions for unknown path and deployment names

/// Maximum Levenshtein distance to consider for suggestions
const MAX_SUGGESTION_DISTANCE: usize = 3;

/// Find the closest candidate within the suggestion distance
pub fn closest_match<'a>(
    target: &str,
    candidates: impl Iterator<Item = &'a str>,
) -> Option<String> {
    candidates
        .map(|candidate| (strsim::levenshtein(target, candidate), candidate))
        .filter(|(distance, _)| *distance > 0 && *distance <= MAX_SUGGESTION_DISTANCE)
        .min_by_key(|(distance, _)| *distance)
        .map(|(_, candidate)| candidate.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_close_match_found() {
        let candidates = ["app.replicas", "app.image.tag"];
        assert_eq!(
            closest_match("app.replica", candidates.iter().copied()),
            Some("app.replicas".to_string())
        );
    }

    #[test]
    fn test_distant_names_are_not_suggested() {
        let candidates = ["prod", "staging"];
        assert_eq!(closest_match("development", candidates.iter().copied()), None);
    }

    #[test]
    fn test_picks_closest() {
        let candidates = ["dev", "demo"];
        assert_eq!(
            closest_match("dav", candidates.iter().copied()),
            Some("dev".to_string())
        );
    }
}
