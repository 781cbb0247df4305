pub mod survey_api;

pub use survey_api::{DraftField, ExportFormat, ExportedDocument, SurveyApiClient, SurveyBackend};
