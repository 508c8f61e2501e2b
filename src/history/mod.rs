pub mod model;
pub mod printer;
pub mod recorder;
pub mod storage;

pub use model::HistoryEntry;
pub use printer::render_history;
pub use recorder::{build_entry, record_history};
pub use storage::HistoryStorage;
