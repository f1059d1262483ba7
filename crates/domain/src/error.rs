//! Unified error types for the domain layer
//!
//! `DomainError` covers values that fail to parse. `GraphError` covers a
//! scenario document that cannot be turned into a playable scene graph; it
//! is fatal for that scenario.

use thiserror::Error;

/// A value that could not be read from its textual form.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("Parse error: {0}")]
    Parse(String),
}

impl DomainError {
    /// Use in `FromStr` implementations when the input matches no variant.
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse(msg.into())
    }
}

/// A scenario document that cannot be played.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GraphError {
    /// The scenario declares no scenes at all
    #[error("Scenario {scenario_id} has no scenes")]
    EmptyGraph { scenario_id: String },

    /// The declared start scene is not part of the graph
    #[error("Scenario {scenario_id} declares unknown start scene {scene_id}")]
    UnknownStartScene {
        scenario_id: String,
        scene_id: String,
    },

    /// A choice points at a scene that does not exist
    #[error("Choice {choice_index} of scene {scene_id} targets unknown scene {target}")]
    DanglingChoice {
        scene_id: String,
        choice_index: usize,
        target: String,
    },

    /// A scene or choice carries an ending tag outside the closed set
    #[error("Unknown ending tag '{tag}' on {location}")]
    UnknownEnding { location: String, tag: String },

    /// The document (or one of its scenes) has the wrong shape
    #[error("Malformed scenario data at {location}: {message}")]
    Malformed { location: String, message: String },
}

impl GraphError {
    pub fn malformed(location: impl Into<String>, message: impl ToString) -> Self {
        Self::Malformed {
            location: location.into(),
            message: message.to_string(),
        }
    }
}

impl From<serde_json::Error> for GraphError {
    fn from(err: serde_json::Error) -> Self {
        Self::malformed("document", err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_error_keeps_message() {
        let err = DomainError::parse("Unknown ending kind: great");
        assert_eq!(err.to_string(), "Parse error: Unknown ending kind: great");
    }

    #[test]
    fn test_dangling_choice_message_names_the_target() {
        let err = GraphError::DanglingChoice {
            scene_id: "s1".into(),
            choice_index: 2,
            target: "nowhere".into(),
        };
        assert_eq!(
            err.to_string(),
            "Choice 2 of scene s1 targets unknown scene nowhere"
        );
    }

    #[test]
    fn test_json_error_becomes_malformed() {
        let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err: GraphError = json_err.into();
        assert!(matches!(err, GraphError::Malformed { .. }));
    }
}
