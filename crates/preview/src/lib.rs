//! Editable preview of generated campaigns: projection into a tabular
//! model, field-level re-validation, and an edit store with dirty tracking.

pub mod normalize;
pub mod projector;
pub mod store;
pub mod types;
pub mod validate;

pub use projector::transform_to_preview;
pub use store::PreviewStore;
pub use types::{AdGroupPreviewRow, AdRow, CampaignPreviewData, KeywordRow};
pub use validate::{validate_campaign_preview, ValidationIssue, ValidationResult};
