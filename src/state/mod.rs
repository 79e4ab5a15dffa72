pub mod bell;

pub use bell::{BellState, PanelState};
