pub mod paginator;
pub mod serializer;

pub use paginator::{paginate, GroupExpansion, GROUP_SIZE};
pub use serializer::{serialize, OPEN_PLACEHOLDER};
