// Campaign workflow - session state, progress events and the two-phase orchestrator
pub mod state;
pub mod progress;
pub mod render;
pub mod orchestrator;

pub use orchestrator::WorkflowOrchestrator;
pub use progress::{ProgressEvent, ProgressReporter, ProgressStep, RunKind};
pub use render::RenderPlan;
pub use state::CampaignState;
