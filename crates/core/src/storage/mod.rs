mod error;
mod traits;
mod types;

pub use error::{Result, StoreError};
pub use traits::ChecklistStore;
pub use types::{FindingIter, FindingSet};
