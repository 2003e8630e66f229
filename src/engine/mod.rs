pub mod feedback;
pub mod history;
pub mod selection;
pub mod tracker;
pub mod wheel;
pub mod words;

pub use history::{HistoryEntry, HistoryLog, OutcomeKind};
pub use selection::{ActivationError, Mode, SelectionEngine};
pub use tracker::{ScrollTracker, Settle};
pub use wheel::{SlotView, WheelModel};
pub use words::{Language, WordSource};
