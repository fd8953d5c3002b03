//! Brainfuck virtual machine
//!
//! This module provides the core execution logic:
//! - [`engine`]: The [`Vm`](engine::Vm) with its fetch-decode-execute loop
//! - [`jumps`]: Bracket validation and the jump table
//! - [`driver`]: A host loop that answers input requests from a queue
//! - [`errors`]: Structural and runtime error types
//!
//! # Execution Model
//!
//! The VM reads the source text one character at a time. `,` suspends
//! execution by returning [`Status::AwaitingInput`](engine::Status) to the
//! caller; nothing blocks inside the VM. The caller delivers a byte with
//! `resume` whenever it has one, and execution continues right after the `,`.

pub mod constants;
pub mod driver;
pub mod engine;
pub mod errors;
pub mod jumps;
