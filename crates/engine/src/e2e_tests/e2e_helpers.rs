//! E2E test helpers for constructing the full application stack.
//!
//! Provides a fully-wired `App` on in-memory adapters, plus scripted
//! stand-ins for the account services.

use std::collections::VecDeque;
use std::sync::Arc;

use async_trait::async_trait;
use branchline_domain::{EndingKind, ScenarioId, ScenarioProgress};
use tokio::sync::RwLock;

use crate::app::{App, AppPorts};
use crate::entities::ScenarioCatalog;
use crate::infrastructure::config::EngineConfig;
use crate::infrastructure::ledger::InMemoryLedger;
use crate::infrastructure::persistence::InMemorySaveRepo;
use crate::infrastructure::ports::{
    CompletionRecorderPort, CurrencyLedgerPort, RecorderError, RewardError, RewardMediaPort,
};
use crate::infrastructure::text::TextTable;
use crate::use_cases::choice::ChoiceResult;

/// `s1 -> s2 -> end_good`, the smallest complete run.
pub(crate) const LINEAR: &str = r#"{
    "start_scene": "s1",
    "scenes": {
        "s1": { "choices": [{ "text": "s1.go", "next": "s2" }] },
        "s2": { "choices": [{ "text": "s2.go", "next": "end_good" }] },
        "end_good": { "ending": "good", "choices": [] }
    }
}"#;

// =============================================================================
// Account service stand-ins
// =============================================================================

/// Completion recorder that remembers every call.
#[derive(Default)]
pub(crate) struct RecordingRecorder {
    completions: RwLock<Vec<(ScenarioId, EndingKind)>>,
}

impl RecordingRecorder {
    pub(crate) async fn completions(&self) -> Vec<(ScenarioId, EndingKind)> {
        self.completions.read().await.clone()
    }
}

#[async_trait]
impl CompletionRecorderPort for RecordingRecorder {
    async fn record_completion(
        &self,
        scenario_id: &ScenarioId,
        ending: EndingKind,
    ) -> Result<(), RecorderError> {
        self.completions
            .write()
            .await
            .push((scenario_id.clone(), ending));
        Ok(())
    }
}

/// Reward media that plays back queued results, then reports unavailable.
#[derive(Default)]
pub(crate) struct ScriptedReward {
    results: RwLock<VecDeque<Result<(), RewardError>>>,
}

impl ScriptedReward {
    pub(crate) async fn push(&self, result: Result<(), RewardError>) {
        self.results.write().await.push_back(result);
    }
}

#[async_trait]
impl RewardMediaPort for ScriptedReward {
    async fn request_reward(&self) -> Result<(), RewardError> {
        self.results
            .write()
            .await
            .pop_front()
            .unwrap_or(Err(RewardError::Unavailable))
    }
}

// =============================================================================
// Test Harness
// =============================================================================

/// Composed `App` plus handles on its in-memory adapters.
pub(crate) struct TestHarness {
    pub app: App,
    pub save_repo: Arc<InMemorySaveRepo>,
    pub ledger: Arc<InMemoryLedger>,
    pub recorder: Arc<RecordingRecorder>,
    pub reward: Arc<ScriptedReward>,
}

impl TestHarness {
    /// Harness with an empty wallet.
    pub(crate) async fn new(scenarios: &[(&str, &str)]) -> Self {
        Self::build(scenarios, 0, TextTable::new("en"), InMemorySaveRepo::new()).await
    }

    pub(crate) async fn with_balance(scenarios: &[(&str, &str)], balance: u32) -> Self {
        Self::build(scenarios, balance, TextTable::new("en"), InMemorySaveRepo::new()).await
    }

    pub(crate) async fn with_text(scenarios: &[(&str, &str)], text: TextTable) -> Self {
        Self::build(scenarios, 0, text, InMemorySaveRepo::new()).await
    }

    /// Harness resuming from an existing save repository.
    pub(crate) async fn with_save_repo(
        scenarios: &[(&str, &str)],
        save_repo: InMemorySaveRepo,
    ) -> Self {
        Self::build(scenarios, 0, TextTable::new("en"), save_repo).await
    }

    async fn build(
        scenarios: &[(&str, &str)],
        balance: u32,
        text: TextTable,
        save_repo: InMemorySaveRepo,
    ) -> Self {
        let config = EngineConfig::default();

        let mut catalog = ScenarioCatalog::new();
        for (id, json) in scenarios {
            catalog
                .load_json(*id, json)
                .expect("test scenario should load");
        }

        let save_repo = Arc::new(save_repo);
        let ledger = Arc::new(InMemoryLedger::with_balance(config.currency.clone(), balance));
        let recorder = Arc::new(RecordingRecorder::default());
        let reward = Arc::new(ScriptedReward::default());

        let app = App::new(
            config,
            catalog,
            AppPorts {
                save_repo: save_repo.clone(),
                ledger: ledger.clone(),
                recorder: recorder.clone(),
                reward: reward.clone(),
                text: Arc::new(text),
            },
        )
        .await;

        Self {
            app,
            save_repo,
            ledger,
            recorder,
            reward,
        }
    }

    /// Balance of the configured premium currency.
    pub(crate) async fn balance(&self) -> u32 {
        self.ledger
            .balance(&self.app.config.currency)
            .await
            .expect("in-memory ledger balance")
    }

    pub(crate) async fn select(
        &self,
        scenario_id: &ScenarioId,
        choice_index: usize,
    ) -> ChoiceResult {
        self.app
            .use_cases
            .choice
            .select
            .execute(scenario_id, choice_index)
            .await
            .expect("choice should succeed")
    }

    pub(crate) async fn progress(&self, scenario_id: &ScenarioId) -> ScenarioProgress {
        self.app
            .entities
            .progress
            .open(scenario_id)
            .await
            .expect("scenario should open")
    }

    pub(crate) async fn current_scene(&self, scenario_id: &ScenarioId) -> String {
        self.progress(scenario_id).await.scene().as_str().to_string()
    }
}
