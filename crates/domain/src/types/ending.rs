//! Ending categories and the scene naming conventions tied to them
//!
//! Scenario packs mark terminal scenes in two ways: an explicit `ending`
//! tag, or an id following the `end_<kind>` convention. Packs written for
//! other locales also use variants such as `good_ending` or `fin_bonne`,
//! which the guide planner accepts when looking for targets.

use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use regex_lite::Regex;
use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// Category of a finished run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EndingKind {
    Good,
    Bad,
    Secret,
}

impl EndingKind {
    /// Every ending category, in display order.
    pub fn all() -> &'static [EndingKind] {
        &[EndingKind::Good, EndingKind::Bad, EndingKind::Secret]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            EndingKind::Good => "good",
            EndingKind::Bad => "bad",
            EndingKind::Secret => "secret",
        }
    }

    /// The scene id a pack uses by default for this ending (`end_good`).
    pub fn conventional_scene_id(&self) -> String {
        format!("end_{}", self.as_str())
    }

    /// Lowercase id fragments that mark a scene as this ending across the
    /// naming conventions found in scenario packs.
    pub fn naming_markers(&self) -> &'static [&'static str] {
        match self {
            EndingKind::Good => &[
                "end_good",
                "good_end",
                "ending_good",
                "good_ending",
                "fin_bonne",
                "bonne_fin",
            ],
            EndingKind::Bad => &[
                "end_bad",
                "bad_end",
                "ending_bad",
                "bad_ending",
                "fin_mauvaise",
                "mauvaise_fin",
            ],
            EndingKind::Secret => &[
                "end_secret",
                "secret_end",
                "ending_secret",
                "secret_ending",
                "fin_secrete",
            ],
        }
    }

    /// Whether a scene id carries one of this ending's naming markers.
    pub fn matches_scene_id(&self, scene_id: &str) -> bool {
        let lowered = scene_id.to_lowercase();
        self.naming_markers()
            .iter()
            .any(|marker| lowered.contains(marker))
    }

    /// Infer the ending from a terminal scene id (`end_good`, `END_Bad_2`).
    ///
    /// Returns `None` for ids outside the `end_<kind>` convention.
    pub fn infer_from_scene_id(scene_id: &str) -> Option<Self> {
        let pattern = terminal_id_pattern()?;
        let captures = pattern.captures(scene_id)?;
        captures.get(1)?.as_str().parse().ok()
    }
}

fn terminal_id_pattern() -> Option<&'static Regex> {
    static PATTERN: OnceLock<Option<Regex>> = OnceLock::new();
    PATTERN
        .get_or_init(|| Regex::new(r"(?i)^end[_-](good|bad|secret)(?:[_-].*)?$").ok())
        .as_ref()
}

impl fmt::Display for EndingKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EndingKind {
    type Err = DomainError;

    /// Case-insensitive; surrounding whitespace is ignored.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "good" => Ok(EndingKind::Good),
            "bad" => Ok(EndingKind::Bad),
            "secret" => Ok(EndingKind::Secret),
            other => Err(DomainError::parse(format!("Unknown ending kind: {}", other))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_case_insensitively() {
        assert_eq!("GOOD".parse::<EndingKind>().unwrap(), EndingKind::Good);
        assert_eq!(" secret ".parse::<EndingKind>().unwrap(), EndingKind::Secret);
        assert!("neutral".parse::<EndingKind>().is_err());
    }

    #[test]
    fn infers_from_conventional_ids() {
        assert_eq!(
            EndingKind::infer_from_scene_id("end_good"),
            Some(EndingKind::Good)
        );
        assert_eq!(
            EndingKind::infer_from_scene_id("END_Bad"),
            Some(EndingKind::Bad)
        );
        assert_eq!(
            EndingKind::infer_from_scene_id("end-secret_2"),
            Some(EndingKind::Secret)
        );
    }

    #[test]
    fn does_not_infer_from_unrelated_ids() {
        assert_eq!(EndingKind::infer_from_scene_id("s1"), None);
        assert_eq!(EndingKind::infer_from_scene_id("the_end_good"), None);
        assert_eq!(EndingKind::infer_from_scene_id("end_goodbye"), None);
    }

    #[test]
    fn markers_cover_alternate_conventions() {
        assert!(EndingKind::Good.matches_scene_id("chapter2_GOOD_ENDING"));
        assert!(EndingKind::Good.matches_scene_id("fin_bonne_a"));
        assert!(!EndingKind::Bad.matches_scene_id("end_good"));
    }

    #[test]
    fn serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&EndingKind::Secret).unwrap(),
            "\"secret\""
        );
    }

    #[test]
    fn conventional_scene_id_uses_end_prefix() {
        assert_eq!(EndingKind::Bad.conventional_scene_id(), "end_bad");
    }
}
