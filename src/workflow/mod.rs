pub mod store;

pub use store::{ReconcileOutcome, ReconcilePolicy, SaveOutcome, SurveyStore, NEW_OPTION_PLACEHOLDER};
