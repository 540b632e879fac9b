pub mod svg;

use std::io;

use thiserror::Error;

use fsm_sketch_core::model::FsmDescription;

/// Writes an FSM description to some visual format.
pub trait Exporter {
    fn export_fsm(&self, fsm: &FsmDescription) -> Result<(), Error>;
}

#[derive(Debug, Error)]
pub enum Error {
    #[error("transition from '{from}' to '{to}' on input '{input}' references unknown state '{state}'")]
    UnknownState {
        from: String,
        to: String,
        input: String,
        state: String,
    },

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}
