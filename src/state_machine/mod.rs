mod handle;
mod state;

pub use handle::{PollHandle, TaskHandle};
pub use state::{CycleOutcome, CycleState};
