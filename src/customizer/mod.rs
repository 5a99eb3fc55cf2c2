pub mod debounce;
pub mod editor;
pub mod session;

pub use editor::WeightEditor;
