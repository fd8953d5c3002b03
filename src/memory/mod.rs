//! Memory model for the Brainfuck virtual machine
//!
//! The VM has a single addressable memory, the [`tape::Tape`]: a fixed run of
//! 30,000 byte cells and a data pointer into it.
//!
//! # Cell Arithmetic
//!
//! Cells are 8 bits wide and wrap explicitly:
//! ```text
//! 255 + 1  →  0
//!   0 - 1  →  255
//! ```
//!
//! The same bit pattern may be read as a signed value (`-1` for `255`) with
//! [`tape::Tape::current_signed`]; the VM itself never depends on the sign.

pub mod tape;

pub use tape::Tape;
