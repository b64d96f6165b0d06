//! Editor session state and logic (UI-agnostic).

mod io;
mod ops;
mod state;

pub use io::SaveOutcome;
pub use ops::DeleteSummary;
pub use state::{Editor, Selection};
