// src/workflow/orchestrator.rs
//! Two-phase campaign workflow: images first, then videos keyed by campaign id.
//!
//! The state lock is only held to check and apply transitions, never across the
//! network call, so the page can keep polling while a generation is running.
//! The call and the commit that ends a Generating phase run on a spawned task:
//! a caller that goes away mid-run cannot leave the session stuck.

use serde::de::DeserializeOwned;
use serde_json::Value;
use std::future::Future;
use std::sync::Arc;
use tokio::sync::{broadcast, RwLock};
use tracing::{error, info, warn};

use super::progress::{ProgressEvent, ProgressReporter, ProgressStep, RunKind};
use super::render::RenderPlan;
use super::state::CampaignState;
use crate::campaign_client::RemoteClient;
use crate::config::AppConfig;
use crate::error::{DataWarning, TransportError, ValidationError, WorkflowError};
use crate::types::{
    CampaignForm, CampaignResponse, SceneImage, VideoForm, VideoResult, VideosResponse, MAX_SCENES,
};

pub struct WorkflowOrchestrator {
    run: GenerationRun,
}

/// Handles a detached run needs to finish on its own
#[derive(Clone)]
struct GenerationRun {
    client: Arc<dyn RemoteClient>,
    config: Arc<AppConfig>,
    state: Arc<RwLock<CampaignState>>,
    progress: Arc<ProgressReporter>,
}

fn decode<T: DeserializeOwned>(endpoint: &str, value: Value) -> Result<T, TransportError> {
    serde_json::from_value(value)
        .map_err(|e| TransportError::new(format!("malformed response from {}: {}", endpoint, e)))
}

impl WorkflowOrchestrator {
    pub fn new(client: Arc<dyn RemoteClient>, config: AppConfig) -> Self {
        Self {
            run: GenerationRun {
                client,
                config: Arc::new(config),
                state: Arc::new(RwLock::new(CampaignState::new())),
                progress: Arc::new(ProgressReporter::new()),
            },
        }
    }

    pub fn config(&self) -> &AppConfig {
        &self.run.config
    }

    pub fn subscribe_progress(&self) -> broadcast::Receiver<ProgressEvent> {
        self.run.progress.subscribe()
    }

    pub async fn snapshot(&self) -> CampaignState {
        self.run.state.read().await.clone()
    }

    pub async fn render_plan(&self) -> RenderPlan {
        RenderPlan::from_state(&*self.run.state.read().await)
    }

    pub async fn reset(&self) -> Result<RenderPlan, WorkflowError> {
        let mut state = self.run.state.write().await;
        if state.is_busy() {
            return Err(WorkflowError::Busy);
        }
        state.reset();
        info!("🔄 Session reset");
        Ok(RenderPlan::from_state(&state))
    }

    /// Phase 1: create the campaign and its scene images
    pub async fn generate_images(&self, form: CampaignForm) -> Result<RenderPlan, WorkflowError> {
        {
            let mut state = self.run.state.write().await;
            if state.is_busy() {
                warn!("Rejected campaign generation while {:?}", state.phase());
                return Err(WorkflowError::Busy);
            }
            if form.num_scenes == 0 || form.num_scenes > MAX_SCENES {
                let err = ValidationError::SceneCountOutOfRange(form.num_scenes);
                state.record_failure(err.to_string());
                return Err(err.into());
            }
            state.begin_image_generation();
        }

        let run = self.run.clone();
        self.run.detach(run.images(form)).await
    }

    /// Phase 2: render videos for whichever campaign id the form names
    pub async fn generate_videos(&self, form: VideoForm) -> Result<RenderPlan, WorkflowError> {
        let campaign_id = form.campaign_id.trim().to_string();
        {
            let mut state = self.run.state.write().await;
            if state.is_busy() {
                warn!("Rejected video generation while {:?}", state.phase());
                return Err(WorkflowError::Busy);
            }
            if campaign_id.is_empty() {
                let err = ValidationError::MissingCampaignId;
                state.record_failure(err.to_string());
                return Err(err.into());
            }
            if state.campaign_id() != Some(campaign_id.as_str()) {
                info!("Generating videos for campaign {} not created in this session", campaign_id);
            }
            state.begin_video_generation();
        }

        let run = self.run.clone();
        self.run.detach(run.videos(campaign_id, form)).await
    }

    /// Bytes of the merged video for the download button
    pub async fn download_final_video(&self) -> Result<Vec<u8>, DataWarning> {
        let url = {
            let state = self.run.state.read().await;
            state
                .video_result()
                .and_then(VideoResult::final_video_url)
                .map(str::to_string)
        };
        let url = url.ok_or(DataWarning::DownloadUnavailable)?;

        self.run
            .client
            .fetch_bytes(&url, self.run.config.download_timeout)
            .await
            .map_err(|e| {
                warn!("⚠️ {}: {}", DataWarning::DownloadUnavailable, e);
                DataWarning::DownloadUnavailable
            })
    }
}

impl GenerationRun {
    /// Runs `work` on its own task; dropping the returned future does not cancel it
    async fn detach<F>(&self, work: F) -> Result<RenderPlan, WorkflowError>
    where
        F: Future<Output = Result<RenderPlan, WorkflowError>> + Send + 'static,
    {
        match tokio::spawn(work).await {
            Ok(outcome) => outcome,
            Err(e) => {
                // the task died before committing, so the Generating phase must be closed here
                Err(self.fail(TransportError::new(format!("generation task failed: {}", e))).await)
            }
        }
    }

    async fn images(self, form: CampaignForm) -> Result<RenderPlan, WorkflowError> {
        info!(
            "🎨 Generating {} campaign for {} ({} scenes)",
            form.campaign_theme, form.business_type, form.num_scenes
        );

        let endpoint = format!("{}/campaign/generate_beauty_campaign", self.config.base_url);
        self.progress.begin_run();
        self.progress.emit_step(RunKind::Images, ProgressStep::Starting);
        self.progress.emit_step(RunKind::Images, ProgressStep::Sending);

        let outcome = match self
            .client
            .call(&endpoint, &form.to_params(), self.config.image_timeout)
            .await
        {
            Ok(value) => decode::<CampaignResponse>(&endpoint, value),
            Err(e) => Err(e),
        };

        let response = match outcome {
            Ok(response) => response,
            Err(e) => return Err(self.fail(e).await),
        };

        self.progress.emit_step(RunKind::Images, ProgressStep::Processing);
        let scenes = SceneImage::from_payloads(response.scenes.unwrap_or_default());
        if scenes.is_empty() {
            warn!("⚠️ {}", DataWarning::NoScenes);
        }
        info!("✅ Campaign {} created with {} scenes", response.campaign_id, scenes.len());

        let plan = {
            let mut state = self.state.write().await;
            state.record_campaign_created(response.campaign_id, scenes);
            RenderPlan::from_state(&state)
        };

        self.finish(RunKind::Images).await;
        Ok(plan)
    }

    async fn videos(self, campaign_id: String, form: VideoForm) -> Result<RenderPlan, WorkflowError> {
        info!("🎬 Generating videos for campaign {}", campaign_id);

        let endpoint = format!(
            "{}/campaign/generate_campaign_videos/{}",
            self.config.base_url,
            urlencoding::encode(&campaign_id)
        );
        self.progress.begin_run();
        self.progress.emit_step(RunKind::Videos, ProgressStep::Starting);
        self.progress.emit_step(RunKind::Videos, ProgressStep::Sending);

        let outcome = match self
            .client
            .call(&endpoint, &form.to_params(), self.config.video_timeout)
            .await
        {
            Ok(value) => decode::<VideosResponse>(&endpoint, value),
            Err(e) => Err(e),
        };

        let response = match outcome {
            Ok(response) => response,
            Err(e) => return Err(self.fail(e).await),
        };

        self.progress.emit_step(RunKind::Videos, ProgressStep::Processing);
        let result = VideoResult::from_response(response);
        match &result {
            VideoResult::Merged { final_video_url } => {
                info!("✅ Final video ready for {}: {}", campaign_id, final_video_url)
            }
            VideoResult::PerScene { videos } => {
                info!("✅ {} scene videos ready for {}", videos.len(), campaign_id)
            }
        }

        let plan = {
            let mut state = self.state.write().await;
            state.record_videos_generated(result);
            RenderPlan::from_state(&state)
        };

        self.finish(RunKind::Videos).await;
        Ok(plan)
    }

    async fn fail(&self, e: TransportError) -> WorkflowError {
        error!("❌ Generation failed: {}", e);
        self.progress.clear();
        self.state.write().await.record_failure(e.message.clone());
        e.into()
    }

    async fn finish(&self, kind: RunKind) {
        self.progress.emit_step(kind, ProgressStep::Done);
        if !self.config.progress_settle.is_zero() {
            tokio::time::sleep(self.config.progress_settle).await;
        }
        self.progress.clear();
    }
}
