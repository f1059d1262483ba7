//! Choice availability.
//!
//! A choice is selectable when its flag requirements hold, or
//! unconditionally while a guide's override is on. The missing-requirements
//! report never looks at the override: it describes the real gap for the
//! unlock UI.

use std::sync::Arc;

use branchline_domain::{Choice, MissingRequirements, ScenarioProgress};

use crate::stores::SessionStore;

pub fn is_choice_available(
    choice: &Choice,
    progress: &ScenarioProgress,
    override_active: bool,
) -> bool {
    override_active || choice.requirements().is_satisfied_by(progress)
}

pub struct ChoiceAvailability {
    session: Arc<SessionStore>,
}

impl ChoiceAvailability {
    pub fn new(session: Arc<SessionStore>) -> Self {
        Self { session }
    }

    pub async fn is_available(&self, choice: &Choice, progress: &ScenarioProgress) -> bool {
        let override_active = self.session.is_override_active().await;
        let available = is_choice_available(choice, progress, override_active);
        tracing::debug!(
            choice = %choice.text(),
            override_active,
            available,
            "Resolved choice availability"
        );
        available
    }

    pub fn missing_requirements(
        &self,
        choice: &Choice,
        progress: &ScenarioProgress,
    ) -> MissingRequirements {
        choice.requirements().missing(progress)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use branchline_domain::{EndingKind, FlagId, FlagRequirements, GuidePlan, ScenarioId, SceneId};

    fn flags(ids: &[&str]) -> Vec<FlagId> {
        ids.iter().map(|id| FlagId::from(*id)).collect()
    }

    fn progress_with(set: &[&str]) -> ScenarioProgress {
        let mut progress = ScenarioProgress::new(SceneId::from("s1"));
        for flag in set {
            progress.set_flag(FlagId::from(*flag));
        }
        progress
    }

    fn requires_all(ids: &[&str]) -> Choice {
        Choice::new("go").with_requirements(FlagRequirements::new(flags(ids), vec![]))
    }

    fn requires_any(ids: &[&str]) -> Choice {
        Choice::new("go").with_requirements(FlagRequirements::new(vec![], flags(ids)))
    }

    async fn session_with_guide() -> Arc<SessionStore> {
        let session = Arc::new(SessionStore::new());
        let plan = GuidePlan::new(EndingKind::Good, vec![SceneId::from("s1")]).expect("plan");
        session.activate_guide(ScenarioId::from("manor"), &plan).await;
        session
    }

    #[tokio::test]
    async fn unconditional_choice_is_available() {
        let availability = ChoiceAvailability::new(Arc::new(SessionStore::new()));

        assert!(
            availability
                .is_available(&Choice::new("go"), &progress_with(&[]))
                .await
        );
    }

    #[tokio::test]
    async fn all_group_needs_every_flag() {
        let availability = ChoiceAvailability::new(Arc::new(SessionStore::new()));
        let choice = requires_all(&["a", "b"]);

        assert!(!availability.is_available(&choice, &progress_with(&[])).await);
        assert!(!availability.is_available(&choice, &progress_with(&["a"])).await);
        assert!(availability.is_available(&choice, &progress_with(&["a", "b"])).await);
    }

    #[tokio::test]
    async fn any_group_needs_one_flag() {
        let availability = ChoiceAvailability::new(Arc::new(SessionStore::new()));
        let choice = requires_any(&["a", "b"]);

        assert!(!availability.is_available(&choice, &progress_with(&[])).await);
        assert!(availability.is_available(&choice, &progress_with(&["b"])).await);
    }

    #[tokio::test]
    async fn groups_are_combined_with_and() {
        let availability = ChoiceAvailability::new(Arc::new(SessionStore::new()));
        let choice = Choice::new("go").with_requirements(FlagRequirements::new(
            flags(&["a"]),
            flags(&["x", "y"]),
        ));

        assert!(!availability.is_available(&choice, &progress_with(&["a"])).await);
        assert!(!availability.is_available(&choice, &progress_with(&["y"])).await);
        assert!(availability.is_available(&choice, &progress_with(&["a", "y"])).await);
    }

    #[tokio::test]
    async fn override_makes_locked_choice_available() {
        let availability = ChoiceAvailability::new(session_with_guide().await);

        assert!(
            availability
                .is_available(&requires_all(&["a", "b"]), &progress_with(&[]))
                .await
        );
        assert!(
            availability
                .is_available(&requires_any(&["x"]), &progress_with(&[]))
                .await
        );
    }

    #[tokio::test]
    async fn missing_requirements_ignore_override() {
        let availability = ChoiceAvailability::new(session_with_guide().await);

        let missing =
            availability.missing_requirements(&requires_all(&["k1"]), &progress_with(&[]));

        assert_eq!(missing.missing_all, flags(&["k1"]));
        assert!(missing.missing_any.is_empty());
    }

    #[test]
    fn missing_any_reports_whole_group() {
        let availability = ChoiceAvailability::new(Arc::new(SessionStore::new()));

        let missing =
            availability.missing_requirements(&requires_any(&["a", "b"]), &progress_with(&[]));

        assert_eq!(missing.missing_any, flags(&["a", "b"]));
        assert!(missing.missing_all.is_empty());
    }
}
