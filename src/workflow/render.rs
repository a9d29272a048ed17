// src/workflow/render.rs
//! What the page should show for a given session state.

use serde::Serialize;

use super::state::CampaignState;
use crate::error::DataWarning;
use crate::types::{SceneVideo, VideoResult, WorkflowPhase};

pub const DOWNLOAD_PATH: &str = "/api/videos/final/download";

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct RenderPlan {
    pub phase: WorkflowPhase,
    pub busy: bool,
    /// Prefill for the editable campaign id input
    pub campaign_id: String,
    pub error: Option<String>,
    pub images: Option<ImagesSection>,
    pub videos: Option<VideoSection>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ImagesSection {
    pub warning: Option<String>,
    pub tiles: Vec<SceneTile>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SceneTile {
    pub scene_number: u32,
    pub caption: String,
    pub image_url: Option<String>,
    pub warning: Option<String>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum VideoSection {
    Merged { url: String, download_path: String },
    Scenes { videos: Vec<SceneVideoTile> },
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SceneVideoTile {
    pub scene_number: u32,
    pub caption: String,
    pub url: String,
}

impl From<&SceneVideo> for SceneVideoTile {
    fn from(video: &SceneVideo) -> Self {
        Self {
            scene_number: video.scene_number,
            caption: format!("Scene {}", video.scene_number),
            url: video.video_url.clone(),
        }
    }
}

impl RenderPlan {
    pub fn from_state(state: &CampaignState) -> Self {
        let images = state.campaign().map(|campaign| {
            let warning = campaign
                .scenes
                .is_empty()
                .then(|| DataWarning::NoScenes.to_string());

            let tiles = campaign
                .scenes
                .iter()
                .map(|scene| SceneTile {
                    scene_number: scene.scene_number,
                    caption: format!("Scene {}", scene.scene_number),
                    image_url: scene.image_url.clone(),
                    warning: scene
                        .image_url
                        .is_none()
                        .then(|| DataWarning::ImageUrlMissing.to_string()),
                })
                .collect();

            ImagesSection { warning, tiles }
        });

        let videos = state.video_result().map(|result| match result {
            VideoResult::Merged { final_video_url } => VideoSection::Merged {
                url: final_video_url.clone(),
                download_path: DOWNLOAD_PATH.to_string(),
            },
            VideoResult::PerScene { videos } => VideoSection::Scenes {
                videos: videos.iter().map(SceneVideoTile::from).collect(),
            },
        });

        Self {
            phase: state.phase(),
            busy: state.is_busy(),
            campaign_id: state.campaign_id().unwrap_or_default().to_string(),
            error: state.last_error().map(str::to_string),
            images,
            videos,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::SceneImage;

    #[test]
    fn test_empty_state_renders_nothing() {
        let plan = RenderPlan::from_state(&CampaignState::new());
        assert_eq!(plan.phase, WorkflowPhase::Idle);
        assert!(plan.images.is_none());
        assert!(plan.videos.is_none());
        assert_eq!(plan.campaign_id, "");
    }

    #[test]
    fn test_missing_image_renders_as_warning_tile() {
        let mut state = CampaignState::new();
        state.record_campaign_created(
            "c1".to_string(),
            vec![
                SceneImage { scene_number: 1, image_url: Some("u1".to_string()) },
                SceneImage { scene_number: 2, image_url: None },
            ],
        );
        let images = RenderPlan::from_state(&state).images.unwrap();
        assert!(images.warning.is_none());
        assert!(images.tiles[0].warning.is_none());
        assert_eq!(images.tiles[1].warning.as_deref(), Some("Image URL missing"));
        assert_eq!(images.tiles[1].caption, "Scene 2");
    }

    #[test]
    fn test_empty_scene_list_is_a_section_warning() {
        let mut state = CampaignState::new();
        state.record_campaign_created("c1".to_string(), vec![]);
        let plan = RenderPlan::from_state(&state);
        assert_eq!(plan.phase, WorkflowPhase::ImagesReady);
        assert_eq!(
            plan.images.unwrap().warning.as_deref(),
            Some("No images were returned from the backend.")
        );
    }

    #[test]
    fn test_per_scene_videos_render_in_order() {
        let mut state = CampaignState::new();
        state.record_videos_generated(VideoResult::PerScene {
            videos: vec![
                SceneVideo { scene_number: 1, video_url: "A".to_string() },
                SceneVideo { scene_number: 2, video_url: "B".to_string() },
            ],
        });
        let Some(VideoSection::Scenes { videos }) = RenderPlan::from_state(&state).videos else {
            panic!("expected scene videos");
        };
        let urls: Vec<&str> = videos.iter().map(|v| v.url.as_str()).collect();
        assert_eq!(urls, vec!["A", "B"]);
    }

    #[test]
    fn test_merged_video_offers_download() {
        let mut state = CampaignState::new();
        state.record_videos_generated(VideoResult::Merged { final_video_url: "v1".to_string() });
        assert_eq!(
            RenderPlan::from_state(&state).videos,
            Some(VideoSection::Merged { url: "v1".to_string(), download_path: DOWNLOAD_PATH.to_string() })
        );
    }
}
