pub mod sequencer;

pub use sequencer::{run_transfer, TransferJob};
