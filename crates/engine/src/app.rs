//! Application state and composition.

use std::sync::Arc;

use crate::entities::{ProfileStore, ProgressStore, ScenarioCatalog};
use crate::infrastructure::config::EngineConfig;
use crate::infrastructure::ports::{
    CompletionRecorderPort, CurrencyLedgerPort, RewardMediaPort, SaveRepo, TextLookupPort,
};
use crate::stores::{SaveStateStore, SessionStore};
use crate::use_cases;
use crate::use_cases::choice::{ChoiceAvailability, GoBack, SelectChoice};
use crate::use_cases::ending::EndingSettings;
use crate::use_cases::guide::GuideSettings;
use crate::use_cases::session::{BuildSceneView, EnterScenario, RestartScenario};
use crate::use_cases::unlock::UnlockSettings;

/// External collaborators the engine is wired against.
pub struct AppPorts {
    pub save_repo: Arc<dyn SaveRepo>,
    pub ledger: Arc<dyn CurrencyLedgerPort>,
    pub recorder: Arc<dyn CompletionRecorderPort>,
    pub reward: Arc<dyn RewardMediaPort>,
    pub text: Arc<dyn TextLookupPort>,
}

/// Main application state.
///
/// Holds the loaded scenarios, stores, entities and use cases.
pub struct App {
    pub config: EngineConfig,
    pub catalog: Arc<ScenarioCatalog>,
    pub entities: Entities,
    pub stores: Stores,
    pub ledger: Arc<dyn CurrencyLedgerPort>,
    pub use_cases: UseCases,
}

/// Container for entity modules.
pub struct Entities {
    pub progress: Arc<ProgressStore>,
    pub profile: Arc<ProfileStore>,
}

/// Container for state stores.
pub struct Stores {
    pub save: Arc<SaveStateStore>,
    pub session: Arc<SessionStore>,
}

/// Container for all use cases.
pub struct UseCases {
    pub choice: use_cases::ChoiceUseCases,
    pub unlock: Arc<use_cases::UnlockChoice>,
    pub guide: Arc<use_cases::GuideUseCase>,
    pub ending: Arc<use_cases::HandleEnding>,
    pub session: use_cases::SessionUseCases,
}

impl App {
    /// Create a new App with all dependencies wired up.
    ///
    /// Loads the save through `ports.save_repo` before returning.
    pub async fn new(config: EngineConfig, catalog: ScenarioCatalog, ports: AppPorts) -> Self {
        let catalog = Arc::new(catalog);

        // Stores
        let save = Arc::new(SaveStateStore::new(
            ports.save_repo.clone(),
            &config.default_lang,
        ));
        save.load().await;
        let session = Arc::new(SessionStore::new());

        // Entities
        let progress = Arc::new(ProgressStore::new(catalog.clone(), save.clone()));
        let profile = Arc::new(ProfileStore::new(save.clone()));

        // Use cases
        let ending = Arc::new(use_cases::HandleEnding::new(
            profile.clone(),
            session.clone(),
            ports.recorder.clone(),
            ports.ledger.clone(),
            EndingSettings {
                currency: config.currency.clone(),
                first_completion_reward: config.first_completion_reward,
                tutorial_scenario: config.tutorial_scenario.clone(),
            },
        ));

        let availability = Arc::new(ChoiceAvailability::new(session.clone()));
        let select = Arc::new(SelectChoice::new(
            progress.clone(),
            availability.clone(),
            ending.clone(),
        ));
        let back = Arc::new(GoBack::new(progress.clone()));
        let choice = use_cases::ChoiceUseCases::new(availability, select.clone(), back);

        let unlock = Arc::new(use_cases::UnlockChoice::new(
            progress.clone(),
            profile.clone(),
            ports.ledger.clone(),
            ports.reward.clone(),
            select,
            UnlockSettings {
                cost: config.unlock_cost,
                currency: config.currency.clone(),
                tutorial_scenario: config.tutorial_scenario.clone(),
            },
        ));

        let guide = Arc::new(use_cases::GuideUseCase::new(
            progress.clone(),
            session.clone(),
            ports.ledger.clone(),
            GuideSettings {
                cost: config.guide_cost,
                currency: config.currency.clone(),
            },
        ));

        let session_use_cases = use_cases::SessionUseCases::new(
            Arc::new(EnterScenario::new(progress.clone(), session.clone())),
            Arc::new(RestartScenario::new(progress.clone(), session.clone())),
            Arc::new(BuildSceneView::new(
                progress.clone(),
                session.clone(),
                save.clone(),
                ports.text.clone(),
            )),
        );

        tracing::info!(
            scenarios = catalog.len(),
            currency = %config.currency,
            "Engine composed"
        );

        Self {
            config,
            catalog,
            entities: Entities { progress, profile },
            stores: Stores { save, session },
            ledger: ports.ledger,
            use_cases: UseCases {
                choice,
                unlock,
                guide,
                ending,
                session: session_use_cases,
            },
        }
    }
}
