//! # Introduction
//!
//! bftty runs Brainfuck programs on a resumable virtual machine. The VM
//! interprets the source text directly and hands control back to its caller
//! whenever the program reads input, so a terminal UI can keep drawing while
//! it waits for a keystroke. The UI is built with
//! [ratatui](https://docs.rs/ratatui).
//!
//! ## Execution pipeline
//!
//! ```text
//! Source → Bracket check → VM ⇄ Host (output, input requests) → TUI / stdout
//! ```
//!
//! 1. [`interpreter`] — validates brackets, then executes instructions and
//!    suspends on `,`.
//! 2. [`memory`] — the 30,000-cell [`memory::Tape`] with its data pointer.
//! 3. [`host`] — the [`host::Host`] capability the VM writes output to and
//!    notifies about input requests.
//! 4. [`plain`] — runs a program over byte streams (stdin/stdout in the
//!    binary's `--plain` mode).
//! 5. [`ui`] — ratatui-based TUI; not part of the stable library API.
//!
//! ## Instruction set
//!
//! `<` `>` move the data pointer, `+` `-` change the current cell (wrapping
//! at 8 bits), `.` outputs it, `,` reads a byte into it, `[` `]` loop while it
//! is non-zero. Every other character is ignored.

pub mod host;
pub mod interpreter;
pub mod memory;
pub mod plain;
pub mod ui;
