// types.rs - Campaign data model and backend wire types
use serde::{Deserialize, Serialize};

/// Largest number of scenes the backend accepts per campaign
pub const MAX_SCENES: u32 = 5;

pub const BUSINESS_TYPES: &[&str] = &["nail salon", "hair salon", "spa"];
pub const CAMPAIGN_THEMES: &[&str] = &["Christmas", "Valentine", "New Year", "Summer", "Spring"];
pub const CHARACTER_GENDERS: &[&str] = &["woman", "man", "non-binary"];

// ============================================================================
// FORMS (user input)
// ============================================================================

/// Input for phase 1 (campaign + scene images)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CampaignForm {
    pub business_type: String,
    pub campaign_theme: String,
    pub character_age: String,
    pub character_gender: String,
    pub character_ethnicity: String,
    pub num_scenes: u32,
}

impl Default for CampaignForm {
    fn default() -> Self {
        Self {
            business_type: BUSINESS_TYPES[0].to_string(),
            campaign_theme: CAMPAIGN_THEMES[0].to_string(),
            character_age: "28-32".to_string(),
            character_gender: CHARACTER_GENDERS[0].to_string(),
            character_ethnicity: "Indian".to_string(),
            num_scenes: 3,
        }
    }
}

impl CampaignForm {
    /// Query parameters in the order the backend documents them
    pub fn to_params(&self) -> Vec<(&'static str, String)> {
        vec![
            ("business_type", self.business_type.clone()),
            ("campaign_theme", self.campaign_theme.clone()),
            ("character_age", self.character_age.clone()),
            ("character_gender", self.character_gender.clone()),
            ("character_ethnicity", self.character_ethnicity.clone()),
            ("num_scenes", self.num_scenes.to_string()),
        ]
    }
}

/// Input for phase 2. The campaign id is editable, so it may name a campaign
/// from an earlier session.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct VideoForm {
    pub campaign_id: String,
    pub business_name: String,
    pub phone_number: String,
    pub website: String,
}

impl Default for VideoForm {
    fn default() -> Self {
        Self {
            campaign_id: String::new(),
            business_name: "Paradise Nails".to_string(),
            phone_number: "9876543210".to_string(),
            website: "https://example.com".to_string(),
        }
    }
}

impl VideoForm {
    pub fn to_params(&self) -> Vec<(&'static str, String)> {
        vec![
            ("business_name", self.business_name.clone()),
            ("phone_number", self.phone_number.clone()),
            ("website", self.website.clone()),
        ]
    }
}

// ============================================================================
// BACKEND RESPONSES
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct CampaignResponse {
    pub campaign_id: String,
    #[serde(default)]
    pub scenes: Option<Vec<SceneImagePayload>>,
}

#[derive(Debug, Deserialize)]
pub struct SceneImagePayload {
    #[serde(default)]
    pub scene_number: Option<u32>,
    #[serde(default)]
    pub image: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct VideosResponse {
    #[serde(default)]
    pub final_merged_video: Option<String>,
    #[serde(default)]
    pub videos: Option<Vec<SceneVideoPayload>>,
}

#[derive(Debug, Deserialize)]
pub struct SceneVideoPayload {
    #[serde(default)]
    pub scene_number: Option<u32>,
    #[serde(default)]
    pub video_url: Option<String>,
}

// ============================================================================
// SESSION DATA MODEL
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Campaign {
    pub campaign_id: String,
    pub scenes: Vec<SceneImage>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SceneImage {
    pub scene_number: u32,
    pub image_url: Option<String>,
}

impl SceneImage {
    /// Builds scenes in backend order; a missing scene number falls back to
    /// the 1-based position and an empty image URL counts as missing.
    pub fn from_payloads(payloads: Vec<SceneImagePayload>) -> Vec<SceneImage> {
        payloads
            .into_iter()
            .enumerate()
            .map(|(index, scene)| SceneImage {
                scene_number: scene.scene_number.unwrap_or(index as u32 + 1),
                image_url: scene.image.filter(|url| !url.is_empty()),
            })
            .collect()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SceneVideo {
    pub scene_number: u32,
    pub video_url: String,
}

/// Phase-2 outcome, resolved once when the response is ingested
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum VideoResult {
    /// A single final advertisement; any per-scene list is ignored
    Merged { final_video_url: String },
    /// Distinct per-scene videos in first-seen order
    PerScene { videos: Vec<SceneVideo> },
}

impl VideoResult {
    pub fn from_response(response: VideosResponse) -> Self {
        if let Some(url) = response.final_merged_video.filter(|url| !url.is_empty()) {
            return VideoResult::Merged { final_video_url: url };
        }

        let mut videos: Vec<SceneVideo> = Vec::new();
        for (index, entry) in response.videos.unwrap_or_default().into_iter().enumerate() {
            let Some(url) = entry.video_url.filter(|url| !url.is_empty()) else {
                continue;
            };
            if videos.iter().any(|seen| seen.video_url == url) {
                continue;
            }
            videos.push(SceneVideo {
                scene_number: entry.scene_number.unwrap_or(index as u32 + 1),
                video_url: url,
            });
        }

        VideoResult::PerScene { videos }
    }

    pub fn final_video_url(&self) -> Option<&str> {
        match self {
            VideoResult::Merged { final_video_url } => Some(final_video_url),
            VideoResult::PerScene { .. } => None,
        }
    }
}

/// Coarse phase of the two-call workflow
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum WorkflowPhase {
    #[default]
    Idle,
    GeneratingImages,
    ImagesReady,
    GeneratingVideos,
    VideosReady,
    Failed,
}

impl WorkflowPhase {
    pub fn is_busy(&self) -> bool {
        matches!(self, WorkflowPhase::GeneratingImages | WorkflowPhase::GeneratingVideos)
    }
}
