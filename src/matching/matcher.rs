//! Waypoint-name to video-filename matching
//!
//! Strategies run in [`MatchStrategy::ORDER`]. The first one that produces any
//! candidate decides; within it the best-scoring candidate wins, with ties
//! going to the lexicographically smallest filename (then full path).

use super::tokens::{significant_tokens, DEFAULT_MIN_TOKEN_LEN};
use crate::types::{MatchStrategy, Video};
use std::cmp::Ordering;

/// Matching parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchConfig {
    /// Tokens shorter than this (in characters) are ignored by token intersection
    pub min_token_len: usize,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            min_token_len: DEFAULT_MIN_TOKEN_LEN,
        }
    }
}

/// The chosen video and the strategy that selected it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchOutcome {
    /// Index into the video slice passed to [`find_match`]
    pub index: usize,
    pub strategy: MatchStrategy,
}

/// A video accepted by a strategy, with its strategy-specific score
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Candidate {
    pub index: usize,
    /// Higher is better; only token intersection scores above 1
    pub score: usize,
}

/// Lowercased stems, computed once per match call
struct Keys {
    name: String,
    stems: Vec<String>,
}

impl Keys {
    fn new(name: &str, videos: &[Video]) -> Self {
        Self {
            name: name.trim().to_lowercase(),
            stems: videos.iter().map(|v| v.stem().to_lowercase()).collect(),
        }
    }
}

/// Pick at most one video for a waypoint name
///
/// Returns `None` when no strategy finds a candidate, which is a normal outcome.
pub fn find_match(name: &str, videos: &[Video], config: &MatchConfig) -> Option<MatchOutcome> {
    let keys = Keys::new(name, videos);
    if keys.name.is_empty() {
        return None;
    }

    MatchStrategy::ORDER.iter().find_map(|&strategy| {
        let candidates = collect_candidates(strategy, &keys, config);
        select_best(&candidates, videos).map(|index| MatchOutcome { index, strategy })
    })
}

/// All videos a single strategy accepts for `name`, in input order
pub fn candidates(
    strategy: MatchStrategy,
    name: &str,
    videos: &[Video],
    config: &MatchConfig,
) -> Vec<Candidate> {
    let keys = Keys::new(name, videos);
    if keys.name.is_empty() {
        return Vec::new();
    }
    collect_candidates(strategy, &keys, config)
}

fn collect_candidates(
    strategy: MatchStrategy,
    keys: &Keys,
    config: &MatchConfig,
) -> Vec<Candidate> {
    let name = keys.name.as_str();

    let accept = |pred: &dyn Fn(&str) -> bool| -> Vec<Candidate> {
        keys.stems
            .iter()
            .enumerate()
            .filter(|(_, stem)| pred(stem))
            .map(|(index, _)| Candidate { index, score: 1 })
            .collect()
    };

    match strategy {
        MatchStrategy::Exact => accept(&|stem: &str| stem == name),
        MatchStrategy::Contains => accept(&|stem: &str| stem.contains(name)),
        MatchStrategy::ReverseContains => {
            accept(&|stem: &str| !stem.is_empty() && name.contains(stem))
        }
        MatchStrategy::TokenIntersection => {
            let name_tokens = significant_tokens(name, config.min_token_len);
            if name_tokens.is_empty() {
                return Vec::new();
            }
            keys.stems
                .iter()
                .enumerate()
                .filter_map(|(index, stem)| {
                    let shared = significant_tokens(stem, config.min_token_len)
                        .intersection(&name_tokens)
                        .count();
                    (shared > 0).then_some(Candidate {
                        index,
                        score: shared,
                    })
                })
                .collect()
        }
    }
}

fn select_best(candidates: &[Candidate], videos: &[Video]) -> Option<usize> {
    candidates
        .iter()
        .min_by(|a, b| {
            b.score
                .cmp(&a.score)
                .then_with(|| tie_break(&videos[a.index], &videos[b.index]))
        })
        .map(|c| c.index)
}

fn tie_break(a: &Video, b: &Video) -> Ordering {
    a.filename
        .cmp(&b.filename)
        .then_with(|| a.path.cmp(&b.path))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn videos(names: &[&str]) -> Vec<Video> {
        names
            .iter()
            .map(|n| Video::unresolved(PathBuf::from("/videos").join(n)))
            .collect()
    }

    fn matched(name: &str, vids: &[Video]) -> Option<(String, MatchStrategy)> {
        find_match(name, vids, &MatchConfig::default())
            .map(|m| (vids[m.index].filename.clone(), m.strategy))
    }

    #[test]
    fn test_exact_outranks_contains() {
        // "site_001" is also a substring of the first stem
        let vids = videos(&["site_001_recording.mp4", "site_001.mov"]);
        assert_eq!(
            matched("site_001", &vids),
            Some(("site_001.mov".to_string(), MatchStrategy::Exact))
        );
    }

    #[test]
    fn test_exact_is_case_insensitive() {
        let vids = videos(&["SITE_001.MP4"]);
        assert_eq!(
            matched("site_001", &vids),
            Some(("SITE_001.MP4".to_string(), MatchStrategy::Exact))
        );
    }

    #[test]
    fn test_contains() {
        let vids = videos(&["site_001_recording.mp4", "other.mp4"]);
        assert_eq!(
            matched("Site_001", &vids),
            Some(("site_001_recording.mp4".to_string(), MatchStrategy::Contains))
        );
    }

    #[test]
    fn test_reverse_contains() {
        let vids = videos(&["ridge.mp4", "valley.mp4"]);
        assert_eq!(
            matched("north_ridge_summit", &vids),
            Some(("ridge.mp4".to_string(), MatchStrategy::ReverseContains))
        );
    }

    #[test]
    fn test_token_intersection_prefers_most_shared() {
        let vids = videos(&["ridge_cam.mp4", "north_ridge_cam.mp4", "lake.mp4"]);
        assert_eq!(
            matched("ridge-north-summit", &vids),
            Some((
                "north_ridge_cam.mp4".to_string(),
                MatchStrategy::TokenIntersection
            ))
        );
    }

    #[test]
    fn test_token_intersection_tie_breaks_on_filename() {
        let vids = videos(&["zulu_ridge.mp4", "alpha_ridge.mp4", "mike_ridge.mp4"]);
        assert_eq!(
            matched("ridge_top", &vids),
            Some(("alpha_ridge.mp4".to_string(), MatchStrategy::TokenIntersection))
        );
    }

    #[test]
    fn test_contains_tie_breaks_on_filename() {
        let vids = videos(&["b_site_001.mp4", "a_site_001.mp4"]);
        assert_eq!(
            matched("site_001", &vids),
            Some(("a_site_001.mp4".to_string(), MatchStrategy::Contains))
        );
    }

    #[test]
    fn test_short_tokens_do_not_match() {
        // "01" and "a" fall under the default minimum length of 3
        let vids = videos(&["a_01.mp4"]);
        assert_eq!(matched("b_01", &vids), None);

        let loose = MatchConfig { min_token_len: 2 };
        let result = find_match("b_01", &vids, &loose).unwrap();
        assert_eq!(result.strategy, MatchStrategy::TokenIntersection);
    }

    #[test]
    fn test_no_match() {
        let vids = videos(&["site_001_recording.mp4", "lake_shore.mov"]);
        assert_eq!(matched("north_ridge", &vids), None);
        assert_eq!(matched("north_ridge", &[]), None);
    }

    #[test]
    fn test_blank_name_never_matches() {
        let vids = videos(&["clip.mp4"]);
        assert_eq!(matched("   ", &vids), None);
    }

    #[test]
    fn test_candidates_per_strategy() {
        let vids = videos(&["site_001.mp4", "site_001_b.mp4", "site.mp4"]);
        let config = MatchConfig::default();

        let exact = candidates(MatchStrategy::Exact, "site_001", &vids, &config);
        assert_eq!(exact, vec![Candidate { index: 0, score: 1 }]);

        let contains: Vec<_> = candidates(MatchStrategy::Contains, "site_001", &vids, &config)
            .iter()
            .map(|c| c.index)
            .collect();
        assert_eq!(contains, vec![0, 1]);

        let reverse: Vec<_> = candidates(MatchStrategy::ReverseContains, "site_001", &vids, &config)
            .iter()
            .map(|c| c.index)
            .collect();
        assert_eq!(reverse, vec![0, 2]);

        let tokens = candidates(MatchStrategy::TokenIntersection, "site_001", &vids, &config);
        assert_eq!(tokens.len(), 3);
        assert_eq!(tokens[0].score, 2);
        assert_eq!(tokens[2].score, 1);
    }

    #[test]
    fn test_result_independent_of_video_order() {
        let forward = videos(&["alpha_ridge.mp4", "zulu_ridge.mp4"]);
        let reverse = videos(&["zulu_ridge.mp4", "alpha_ridge.mp4"]);
        assert_eq!(matched("ridge_top", &forward), matched("ridge_top", &reverse));
    }
}
