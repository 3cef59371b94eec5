pub mod model;
pub mod transition;

pub use model::{AccountInfo, State};
pub use transition::{apply_transaction, run_transactions};
