// lib.rs - AI Ad Studio: client for the two-phase campaign generation backend
pub mod types;
pub mod error;
pub mod config;
pub mod campaign_client;
pub mod workflow;
pub mod handlers;
pub mod middleware;

pub use campaign_client::{CampaignClient, RemoteClient};
pub use config::AppConfig;
pub use error::{ConfigError, DataWarning, TransportError, ValidationError, WorkflowError};
pub use types::*;
pub use workflow::{CampaignState, RenderPlan, WorkflowOrchestrator};

/// Shared state for the handlers: one orchestrator, one session
pub struct AppState {
    pub orchestrator: WorkflowOrchestrator,
}
