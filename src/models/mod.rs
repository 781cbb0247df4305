pub mod edit;
pub mod loaders;
pub mod question;

pub use edit::{EditOp, EditScript};
pub use loaders::{load_draft_file, load_edit_script, DraftSnapshot};
pub use question::{Question, QuestionGroup, QuestionId, QuestionType};
