//! Non-interactive front end: run a program over byte streams
//!
//! Output goes straight to a writer through [`StreamHost`]; every input
//! request is answered with one byte read from the reader, after any
//! initial input is used up.

use std::io::{Read, Write};

use tracing::warn;

use crate::host::StreamHost;
use crate::interpreter::driver::Driver;
use crate::interpreter::engine::Status;
use crate::interpreter::errors::BfError;

/// Process exit code for a finished run
pub fn exit_code(result: &Result<Status, BfError>) -> i32 {
    match result {
        Ok(Status::Halted) => 0,
        // Input ran out while the program was still waiting for a byte
        Ok(Status::AwaitingInput) => 2,
        Err(_) => 1,
    }
}

/// Run `source` reading input bytes from `input` and writing output to `output`.
///
/// Returns [`Status::AwaitingInput`] when `input` reaches end of file while
/// the program is still waiting. A failed write is returned as
/// [`BfError::Io`] once the VM stops.
pub fn run_streams<R: Read, W: Write>(
    source: &str,
    initial_input: &[u8],
    mut input: R,
    output: W,
) -> Result<Status, BfError> {
    let mut driver = Driver::new(source, StreamHost::new(output))?;
    driver.feed(initial_input);

    let mut status = driver.pump()?;

    while status == Status::AwaitingInput {
        let mut byte = [0u8; 1];
        if input.read(&mut byte)? == 0 {
            warn!(
                "input closed while the program waits for a byte at {}",
                driver.vm().program_counter()
            );
            break;
        }
        status = driver.deliver(byte[0])?.unwrap_or(status);
    }

    if let Some(e) = driver.vm_mut().host_mut().take_error() {
        return Err(e.into());
    }
    driver.into_vm().into_host().into_inner().flush()?;

    Ok(status)
}
