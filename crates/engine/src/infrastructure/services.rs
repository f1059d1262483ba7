//! Local stand-ins for the account services.
//!
//! Used by the text runner, which has no backend to talk to.

use async_trait::async_trait;
use branchline_domain::{EndingKind, ScenarioId};

use crate::infrastructure::ports::{
    CompletionRecorderPort, RecorderError, RewardError, RewardMediaPort,
};

/// Records completions to the log only.
#[derive(Debug, Default)]
pub struct LogCompletionRecorder;

#[async_trait]
impl CompletionRecorderPort for LogCompletionRecorder {
    async fn record_completion(
        &self,
        scenario_id: &ScenarioId,
        ending: EndingKind,
    ) -> Result<(), RecorderError> {
        tracing::info!(scenario_id = %scenario_id, ending = %ending, "Scenario completed");
        Ok(())
    }
}

/// No reward media offline.
#[derive(Debug, Default)]
pub struct OfflineRewardMedia;

#[async_trait]
impl RewardMediaPort for OfflineRewardMedia {
    async fn request_reward(&self) -> Result<(), RewardError> {
        Err(RewardError::Unavailable)
    }
}
