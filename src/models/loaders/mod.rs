pub mod draft_loader;

pub use draft_loader::{load_draft_file, load_edit_script, parse_draft_file, DraftSnapshot};
