//! Campaign generation pipeline: collaborator contracts, rule-based
//! generators, and the staged orchestrator that turns a product batch into
//! draft campaigns.

pub mod adgroups;
pub mod copy;
pub mod keywords;
pub mod naming;
pub mod orchestrator;
pub mod queue;
pub mod status;
pub mod traits;

pub use orchestrator::{GenerationOrchestrator, GenerationRun, GenerationStage, RunProgress};
pub use status::{capture_sink, tracing_sink, StatusSink};
pub use traits::{AdCopyValidator, AdGroupGenerator, KeywordGenerator, RsaGenerator};
