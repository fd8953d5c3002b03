//! Error types for the Brainfuck virtual machine
//!
//! This module separates the two phases in which a program can fail:
//!
//! - [`StructuralError`] is raised while a [`Vm`](super::engine::Vm) is being
//!   constructed, before any instruction runs. The caller should reject the
//!   program.
//! - [`RuntimeError`] is raised by `run`, `step` and `resume`. Tape bound
//!   violations are fatal and leave the VM in [`VmState::Faulted`]; misuse
//!   errors (resuming a VM that is not waiting) leave the VM untouched.
//!
//! [`BfError`] is the top-level error returned by [`crate::plain`] and the
//! binary; it also carries I/O failures from the output stream.

use crate::interpreter::engine::VmState;
use thiserror::Error;

/// Bracket structure violations detected at construction time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum StructuralError {
    /// A `]` with no open `[` before it
    #[error("Unmatched ']' at position {position}")]
    UnmatchedClose { position: usize },

    /// A `[` still open when the end of the program is reached
    #[error("Unclosed '[' at position {position}")]
    UnclosedOpen { position: usize },
}

impl StructuralError {
    /// Character index in the source where the mismatch was found
    pub fn position(&self) -> usize {
        match self {
            StructuralError::UnmatchedClose { position } => *position,
            StructuralError::UnclosedOpen { position } => *position,
        }
    }
}

/// Errors raised while executing a program
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum RuntimeError {
    /// `<` moved the data pointer below cell 0
    #[error("Data pointer moved below cell 0 at position {pc}")]
    TapeUnderflow { pc: usize },

    /// `>` moved the data pointer past the last cell
    #[error("Data pointer moved past the end of the tape at position {pc}")]
    TapeOverflow { pc: usize },

    /// `resume` was called while the VM was not waiting for input
    #[error("Cannot resume: VM is {state}, not awaiting input")]
    NotAwaitingInput { state: VmState },

    /// The VM hit a fatal error earlier and can no longer run
    #[error("VM is faulted and cannot continue")]
    Faulted,
}

impl RuntimeError {
    /// Whether this error invalidates the VM that produced it
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            RuntimeError::TapeUnderflow { .. } | RuntimeError::TapeOverflow { .. }
        )
    }

    /// Program counter of the failing instruction, if the error came from one
    pub fn pc(&self) -> Option<usize> {
        match self {
            RuntimeError::TapeUnderflow { pc } => Some(*pc),
            RuntimeError::TapeOverflow { pc } => Some(*pc),
            RuntimeError::NotAwaitingInput { .. } => None,
            RuntimeError::Faulted => None,
        }
    }
}

/// Any error surfaced to the command-line front end
#[derive(Debug, Error)]
pub enum BfError {
    #[error("Structural error: {0}")]
    Structural(#[from] StructuralError),

    #[error("Runtime error: {0}")]
    Runtime(#[from] RuntimeError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
