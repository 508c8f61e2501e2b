pub mod model;
pub mod store;

pub use model::{Folder, Workspace};
pub use store::WorkspaceStore;
