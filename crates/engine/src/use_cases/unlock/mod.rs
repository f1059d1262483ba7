//! Monetized unlock use cases.
//!
//! A locked choice can be opened by spending premium currency or by
//! finishing reward media. Either way the missing flags are granted and
//! the choice is selected again.

use std::sync::Arc;

use branchline_domain::{
    CurrencyKind, FlagId, GameEvent, GrantSource, MissingRequirements, ScenarioId, SceneId,
};

use crate::entities::{ProfileStore, ProgressError, ProgressStore};
use crate::infrastructure::ports::{CurrencyLedgerPort, LedgerError, RewardError, RewardMediaPort};
use crate::use_cases::choice::{ensure_running, ChoiceError, ChoiceResult, SelectChoice};

#[derive(Debug, Clone)]
pub struct UnlockSettings {
    pub cost: u32,
    pub currency: CurrencyKind,
    pub tutorial_scenario: ScenarioId,
}

/// What the unlock dialog shows for a locked choice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnlockPrompt {
    pub scenario_id: ScenarioId,
    pub scene_id: SceneId,
    pub choice_index: usize,
    pub missing: MissingRequirements,
    pub cost: u32,
    pub currency: CurrencyKind,
    /// The dialog cannot be dismissed until the player pays.
    pub forced: bool,
}

#[derive(Debug, Clone)]
pub struct UnlockResult {
    pub granted: Vec<FlagId>,
    /// Result of selecting the choice again.
    pub choice: ChoiceResult,
    /// `FlagsGranted`, then the choice's own events.
    pub events: Vec<GameEvent>,
}

/// Unlock choice use case.
pub struct UnlockChoice {
    progress: Arc<ProgressStore>,
    profile: Arc<ProfileStore>,
    ledger: Arc<dyn CurrencyLedgerPort>,
    reward: Arc<dyn RewardMediaPort>,
    select: Arc<SelectChoice>,
    settings: UnlockSettings,
}

impl UnlockChoice {
    pub fn new(
        progress: Arc<ProgressStore>,
        profile: Arc<ProfileStore>,
        ledger: Arc<dyn CurrencyLedgerPort>,
        reward: Arc<dyn RewardMediaPort>,
        select: Arc<SelectChoice>,
        settings: UnlockSettings,
    ) -> Self {
        Self {
            progress,
            profile,
            ledger,
            reward,
            select,
            settings,
        }
    }

    /// Describe the unlock offer for a locked choice.
    pub async fn prompt(
        &self,
        scenario_id: &ScenarioId,
        choice_index: usize,
    ) -> Result<UnlockPrompt, UnlockError> {
        let (scene_id, missing) = self.locked_choice(scenario_id, choice_index).await?;
        let forced = self.is_tutorial(scenario_id) && !self.profile.forced_unlock_completed().await;

        Ok(UnlockPrompt {
            scenario_id: scenario_id.clone(),
            scene_id,
            choice_index,
            missing,
            cost: self.settings.cost,
            currency: self.settings.currency.clone(),
            forced,
        })
    }

    /// Grant what a locked choice is missing.
    ///
    /// Every missing "all" flag is set. Failing that, only the first flag of
    /// the missing "any" group is set.
    pub async fn grant_missing_flags(
        &self,
        scenario_id: &ScenarioId,
        missing: &MissingRequirements,
    ) -> Result<Vec<FlagId>, UnlockError> {
        let flags = missing.flags_to_grant();
        if !flags.is_empty() {
            self.progress.grant_flags(scenario_id, &flags).await?;
        }
        Ok(flags)
    }

    /// Pay the unlock cost, grant the flags and take the choice.
    ///
    /// In the tutorial scenario the first paid unlock is seeded: the cost is
    /// credited just before it is spent, once per device.
    pub async fn with_currency(
        &self,
        scenario_id: &ScenarioId,
        choice_index: usize,
    ) -> Result<UnlockResult, UnlockError> {
        let (_, missing) = self.locked_choice(scenario_id, choice_index).await?;
        let tutorial = self.is_tutorial(scenario_id);

        if tutorial && !self.profile.tutorial_currency_seeded().await {
            self.seed_tutorial_currency().await;
        }

        self.ledger
            .spend(&self.settings.currency, self.settings.cost)
            .await
            .map_err(|e| match e {
                LedgerError::InsufficientFunds { kind, needed } => {
                    tracing::info!(
                        scenario_id = %scenario_id,
                        currency = %kind,
                        needed,
                        "Unlock refused, insufficient funds"
                    );
                    UnlockError::InsufficientFunds { kind, needed }
                }
                other => UnlockError::Ledger(other),
            })?;

        let granted = self.grant_missing_flags(scenario_id, &missing).await?;
        if tutorial && self.profile.mark_forced_unlock_completed().await {
            tracing::info!(scenario_id = %scenario_id, "Forced unlock tutorial completed");
        }

        self.finish(scenario_id, choice_index, granted, GrantSource::CurrencySpend)
            .await
    }

    /// Play reward media, then grant the flags and take the choice.
    pub async fn with_reward(
        &self,
        scenario_id: &ScenarioId,
        choice_index: usize,
    ) -> Result<UnlockResult, UnlockError> {
        let (_, missing) = self.locked_choice(scenario_id, choice_index).await?;

        if let Err(e) = self.reward.request_reward().await {
            tracing::info!(scenario_id = %scenario_id, error = %e, "Reward not granted");
            return Err(UnlockError::RewardUnavailable(e));
        }

        let granted = self.grant_missing_flags(scenario_id, &missing).await?;
        self.finish(scenario_id, choice_index, granted, GrantSource::RewardMedia)
            .await
    }

    async fn seed_tutorial_currency(&self) {
        match self
            .ledger
            .grant(&self.settings.currency, self.settings.cost)
            .await
        {
            Ok(()) => {
                self.profile.mark_tutorial_currency_seeded().await;
                tracing::info!(
                    currency = %self.settings.currency,
                    amount = self.settings.cost,
                    "Seeded tutorial currency"
                );
            }
            Err(e) => tracing::warn!(error = %e, "Failed to seed tutorial currency"),
        }
    }

    async fn finish(
        &self,
        scenario_id: &ScenarioId,
        choice_index: usize,
        granted: Vec<FlagId>,
        source: GrantSource,
    ) -> Result<UnlockResult, UnlockError> {
        tracing::info!(
            scenario_id = %scenario_id,
            choice_index,
            flags = ?granted,
            source = ?source,
            "Flags granted"
        );
        let mut choice = self.select.execute(scenario_id, choice_index).await?;

        let mut events = vec![GameEvent::FlagsGranted {
            scenario_id: scenario_id.clone(),
            flags: granted.clone(),
            source,
        }];
        events.append(&mut choice.events);
        Ok(UnlockResult {
            granted,
            choice,
            events,
        })
    }

    async fn locked_choice(
        &self,
        scenario_id: &ScenarioId,
        choice_index: usize,
    ) -> Result<(SceneId, MissingRequirements), UnlockError> {
        let graph = self.progress.graph(scenario_id)?;
        let progress = self.progress.open(scenario_id).await?;
        ensure_running(scenario_id, &progress)?;
        let scene_id = progress.scene().clone();
        let choice = graph
            .get_scene(scene_id.as_str())
            .and_then(|scene| scene.choice(choice_index))
            .ok_or_else(|| UnlockError::UnknownChoice {
                scene_id: scene_id.clone(),
                index: choice_index,
            })?;

        let missing = choice.requirements().missing(&progress);
        if missing.is_empty() {
            return Err(UnlockError::AlreadyUnlocked {
                scene_id,
                index: choice_index,
            });
        }
        Ok((scene_id, missing))
    }

    fn is_tutorial(&self, scenario_id: &ScenarioId) -> bool {
        scenario_id == &self.settings.tutorial_scenario
    }
}

#[derive(Debug, thiserror::Error)]
pub enum UnlockError {
    #[error(transparent)]
    Progress(#[from] ProgressError),
    #[error(transparent)]
    Choice(#[from] ChoiceError),
    #[error("Scene {scene_id} has no choice {index}")]
    UnknownChoice { scene_id: SceneId, index: usize },
    #[error("Choice {index} of scene {scene_id} is not locked")]
    AlreadyUnlocked { scene_id: SceneId, index: usize },
    #[error("Insufficient {kind}: {needed} needed")]
    InsufficientFunds { kind: CurrencyKind, needed: u32 },
    #[error("Reward unavailable: {0}")]
    RewardUnavailable(RewardError),
    #[error("Ledger error: {0}")]
    Ledger(LedgerError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::e2e_tests::e2e_helpers::TestHarness;
    use crate::use_cases::choice::ChoiceOutcome;

    const LOCKED: &str = r#"{
        "start_scene": "s1",
        "scenes": {
            "s1": { "choices": [
                { "text": "door", "next": "s2", "requires_all_flags": ["k1"] },
                { "text": "window", "next": "s2", "requires_any_flags": ["a", "b"] },
                { "text": "walk", "next": "s2" },
                { "text": "give up", "ending": "bad" }
            ] },
            "s2": { "choices": [{ "next": "s3" }] },
            "s3": { "choices": [] }
        }
    }"#;

    fn manor() -> ScenarioId {
        ScenarioId::from("manor")
    }

    #[tokio::test]
    async fn grant_missing_all_sets_every_flag() {
        let harness = TestHarness::new(&[("manor", LOCKED)]).await;
        let missing = MissingRequirements {
            missing_all: vec![FlagId::from("x"), FlagId::from("y")],
            missing_any: vec![FlagId::from("z")],
        };

        let granted = harness
            .app
            .use_cases
            .unlock
            .grant_missing_flags(&manor(), &missing)
            .await
            .expect("grant should succeed");

        assert_eq!(granted, vec![FlagId::from("x"), FlagId::from("y")]);
        let progress = harness.progress(&manor()).await;
        assert!(progress.has_flag(&FlagId::from("x")));
        assert!(progress.has_flag(&FlagId::from("y")));
        assert!(!progress.has_flag(&FlagId::from("z")));
    }

    #[tokio::test]
    async fn grant_missing_any_sets_first_flag_only() {
        let harness = TestHarness::new(&[("manor", LOCKED)]).await;
        let missing = MissingRequirements {
            missing_all: vec![],
            missing_any: vec![FlagId::from("a"), FlagId::from("b")],
        };

        let granted = harness
            .app
            .use_cases
            .unlock
            .grant_missing_flags(&manor(), &missing)
            .await
            .expect("grant should succeed");

        assert_eq!(granted, vec![FlagId::from("a")]);
        assert!(!harness.progress(&manor()).await.has_flag(&FlagId::from("b")));
    }

    #[tokio::test]
    async fn paid_unlock_grants_and_takes_choice() {
        let harness = TestHarness::with_balance(&[("manor", LOCKED)], 1).await;

        let result = harness
            .app
            .use_cases
            .unlock
            .with_currency(&manor(), 0)
            .await
            .expect("unlock should succeed");

        assert_eq!(result.granted, vec![FlagId::from("k1")]);
        assert_eq!(
            result.choice.outcome,
            ChoiceOutcome::Moved {
                scene_id: SceneId::from("s2")
            }
        );
        assert!(matches!(
            result.events.first(),
            Some(GameEvent::FlagsGranted {
                source: GrantSource::CurrencySpend,
                ..
            })
        ));
        assert_eq!(harness.balance().await, 0);
    }

    #[tokio::test]
    async fn insufficient_funds_leaves_choice_locked() {
        let harness = TestHarness::new(&[("manor", LOCKED)]).await;

        let result = harness
            .app
            .use_cases
            .unlock
            .with_currency(&manor(), 0)
            .await;

        assert!(matches!(
            result,
            Err(UnlockError::InsufficientFunds { needed: 1, .. })
        ));
        let progress = harness.progress(&manor()).await;
        assert!(!progress.has_flag(&FlagId::from("k1")));
        assert_eq!(progress.scene().as_str(), "s1");
    }

    #[tokio::test]
    async fn reward_unlock_is_free() {
        let harness = TestHarness::new(&[("manor", LOCKED)]).await;
        harness.reward.push(Ok(())).await;

        let result = harness
            .app
            .use_cases
            .unlock
            .with_reward(&manor(), 1)
            .await
            .expect("unlock should succeed");

        assert_eq!(result.granted, vec![FlagId::from("a")]);
        assert_eq!(result.choice.progress.scene().as_str(), "s2");
        assert_eq!(harness.balance().await, 0);
    }

    #[tokio::test]
    async fn failed_reward_changes_nothing() {
        let harness = TestHarness::new(&[("manor", LOCKED)]).await;
        harness.reward.push(Err(RewardError::Cancelled)).await;

        let result = harness
            .app
            .use_cases
            .unlock
            .with_reward(&manor(), 1)
            .await;

        assert!(matches!(
            result,
            Err(UnlockError::RewardUnavailable(RewardError::Cancelled))
        ));
        let progress = harness.progress(&manor()).await;
        assert_eq!(progress.active_flags().count(), 0);
    }

    #[tokio::test]
    async fn open_choice_is_not_unlockable() {
        let harness = TestHarness::with_balance(&[("manor", LOCKED)], 1).await;

        let result = harness
            .app
            .use_cases
            .unlock
            .with_currency(&manor(), 2)
            .await;

        assert!(matches!(
            result,
            Err(UnlockError::AlreadyUnlocked { index: 2, .. })
        ));
        assert_eq!(harness.balance().await, 1);
    }

    #[tokio::test]
    async fn tutorial_prompt_is_forced_until_first_paid_unlock() {
        let harness = TestHarness::new(&[("tutorial", LOCKED)]).await;
        let tutorial = ScenarioId::from("tutorial");
        let unlock = &harness.app.use_cases.unlock;

        let before = unlock.prompt(&tutorial, 0).await.expect("prompt");
        assert!(before.forced);

        unlock
            .with_currency(&tutorial, 0)
            .await
            .expect("seeded unlock should succeed");
        harness
            .app
            .use_cases
            .choice
            .back
            .execute(&tutorial)
            .await
            .expect("back should succeed");

        let after = unlock.prompt(&tutorial, 1).await.expect("prompt");
        assert!(!after.forced);
    }

    #[tokio::test]
    async fn tutorial_seed_is_applied_once() {
        let harness = TestHarness::new(&[("tutorial", LOCKED)]).await;
        let tutorial = ScenarioId::from("tutorial");
        let unlock = &harness.app.use_cases.unlock;

        unlock
            .with_currency(&tutorial, 0)
            .await
            .expect("seeded unlock should succeed");
        harness
            .app
            .use_cases
            .choice
            .back
            .execute(&tutorial)
            .await
            .expect("back should succeed");
        let second = unlock.with_currency(&tutorial, 1).await;

        assert!(matches!(
            second,
            Err(UnlockError::InsufficientFunds { .. })
        ));
        assert!(harness.app.entities.profile.tutorial_currency_seeded().await);
        assert_eq!(harness.balance().await, 0);
    }

    #[tokio::test]
    async fn non_tutorial_prompt_is_never_forced() {
        let harness = TestHarness::new(&[("manor", LOCKED)]).await;

        let prompt = harness
            .app
            .use_cases
            .unlock
            .prompt(&manor(), 1)
            .await
            .expect("prompt");

        assert!(!prompt.forced);
        assert_eq!(prompt.missing.missing_any, vec![FlagId::from("a"), FlagId::from("b")]);
        assert_eq!(prompt.cost, 1);
    }

    #[tokio::test]
    async fn finished_run_is_not_charged_for_unlocks() {
        let harness = TestHarness::with_balance(&[("manor", LOCKED)], 1).await;
        harness.select(&manor(), 3).await;
        let balance = harness.balance().await;

        let result = harness
            .app
            .use_cases
            .unlock
            .with_currency(&manor(), 0)
            .await;

        assert!(matches!(
            result,
            Err(UnlockError::Choice(ChoiceError::RunEnded { .. }))
        ));
        assert_eq!(harness.balance().await, balance);
        assert!(!harness.progress(&manor()).await.has_flag(&FlagId::from("k1")));
    }
}
