//! studyplan-ingest: turn external inputs (unit manifests, material outlines,
//! AI study-plan replies) into ordered `Unit` lists for the generator.

pub mod types;
pub mod parsers;
pub mod suggestion;

pub use types::{ManifestRow, SuggestionSource};
pub use parsers::outline::parse_outline_text;
pub use parsers::unit_manifest::{parse_unit_manifest, parse_unit_manifest_str};
pub use suggestion::{StudyPlanSuggestion, parse_suggestion};
