//! Export of edited campaign previews into downloadable artifacts.

pub mod csv_export;

pub use csv_export::{export_google_ads_editor_csv, validate_for_export};
