// CampaignState - Session-scoped record of the two-phase workflow
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::{Campaign, SceneImage, VideoResult, WorkflowPhase};

/// Everything the session knows about the current campaign.
///
/// Mutators are crate-private: only the orchestrator drives transitions.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct CampaignState {
    /// Active phase of the workflow
    phase: WorkflowPhase,

    /// Latest successful phase-1 result
    campaign: Option<Campaign>,

    /// Latest successful phase-2 result
    video_result: Option<VideoResult>,

    /// Message from the most recent failure, cleared by the next success
    last_error: Option<String>,

    updated_at: Option<DateTime<Utc>>,
}

impl CampaignState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> WorkflowPhase {
        self.phase
    }

    pub fn campaign(&self) -> Option<&Campaign> {
        self.campaign.as_ref()
    }

    pub fn campaign_id(&self) -> Option<&str> {
        self.campaign.as_ref().map(|c| c.campaign_id.as_str())
    }

    pub fn scenes(&self) -> &[SceneImage] {
        self.campaign.as_ref().map(|c| c.scenes.as_slice()).unwrap_or(&[])
    }

    pub fn video_result(&self) -> Option<&VideoResult> {
        self.video_result.as_ref()
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn updated_at(&self) -> Option<DateTime<Utc>> {
        self.updated_at
    }

    pub fn is_busy(&self) -> bool {
        self.phase.is_busy()
    }

    fn touch(&mut self) {
        self.updated_at = Some(Utc::now());
    }

    pub(crate) fn begin_image_generation(&mut self) {
        self.phase = WorkflowPhase::GeneratingImages;
        self.touch();
    }

    /// Old videos are dropped up front so they never show against a failed run
    pub(crate) fn begin_video_generation(&mut self) {
        self.phase = WorkflowPhase::GeneratingVideos;
        self.video_result = None;
        self.touch();
    }

    /// New images invalidate any existing videos
    pub(crate) fn record_campaign_created(&mut self, campaign_id: String, scenes: Vec<SceneImage>) {
        self.campaign = Some(Campaign { campaign_id, scenes });
        self.video_result = None;
        self.last_error = None;
        self.phase = WorkflowPhase::ImagesReady;
        self.touch();
    }

    pub(crate) fn record_videos_generated(&mut self, result: VideoResult) {
        self.video_result = Some(result);
        self.last_error = None;
        self.phase = WorkflowPhase::VideosReady;
        self.touch();
    }

    /// Keeps every earlier success
    pub(crate) fn record_failure(&mut self, message: String) {
        self.last_error = Some(message);
        self.phase = WorkflowPhase::Failed;
        self.touch();
    }

    pub(crate) fn reset(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scenes() -> Vec<SceneImage> {
        vec![
            SceneImage { scene_number: 2, image_url: Some("u2".to_string()) },
            SceneImage { scene_number: 1, image_url: Some("u1".to_string()) },
            SceneImage { scene_number: 3, image_url: None },
        ]
    }

    fn merged(url: &str) -> VideoResult {
        VideoResult::Merged { final_video_url: url.to_string() }
    }

    #[test]
    fn test_campaign_created_keeps_backend_order() {
        let mut state = CampaignState::new();
        assert!(state.campaign_id().is_none());

        state.record_campaign_created("c1".to_string(), scenes());
        assert_eq!(state.phase(), WorkflowPhase::ImagesReady);
        assert_eq!(state.campaign_id(), Some("c1"));
        assert_eq!(state.scenes(), scenes().as_slice());
    }

    #[test]
    fn test_new_campaign_clears_videos_from_any_phase() {
        let mut state = CampaignState::new();
        state.record_campaign_created("c1".to_string(), scenes());
        state.record_videos_generated(merged("v1"));
        assert_eq!(state.phase(), WorkflowPhase::VideosReady);

        state.record_campaign_created("c2".to_string(), vec![]);
        assert!(state.video_result().is_none());
        assert_eq!(state.phase(), WorkflowPhase::ImagesReady);

        state.record_videos_generated(merged("v2"));
        state.record_failure("boom".to_string());
        state.record_campaign_created("c3".to_string(), scenes());
        assert!(state.video_result().is_none());
        assert!(state.last_error().is_none());
    }

    #[test]
    fn test_failure_retains_prior_results() {
        let mut state = CampaignState::new();
        state.record_campaign_created("c1".to_string(), scenes());
        state.record_videos_generated(merged("v1"));

        state.record_failure("backend unavailable".to_string());
        assert_eq!(state.phase(), WorkflowPhase::Failed);
        assert_eq!(state.last_error(), Some("backend unavailable"));
        assert_eq!(state.campaign_id(), Some("c1"));
        assert_eq!(state.video_result(), Some(&merged("v1")));
    }

    #[test]
    fn test_begin_video_generation_drops_stale_videos() {
        let mut state = CampaignState::new();
        state.record_campaign_created("c1".to_string(), scenes());
        state.record_videos_generated(merged("v1"));

        state.begin_video_generation();
        assert!(state.is_busy());
        assert!(state.video_result().is_none());
        assert_eq!(state.scenes().len(), 3);
    }

    #[test]
    fn test_reset_returns_to_idle() {
        let mut state = CampaignState::new();
        state.record_campaign_created("c1".to_string(), scenes());
        state.record_failure("x".to_string());
        state.reset();
        assert_eq!(state, CampaignState::default());
        assert_eq!(state.phase(), WorkflowPhase::Idle);
    }
}
