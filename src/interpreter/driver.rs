//! Host loop with a type-ahead input queue
//!
//! [`Driver`] wraps a [`Vm`] and a FIFO of bytes the user typed before the
//! program asked for them. Whenever the VM suspends on `,` and a byte is
//! already queued, the byte is delivered at once; otherwise the driver reports
//! [`Status::AwaitingInput`] and waits for [`Driver::deliver`].

use crate::host::Host;
use crate::interpreter::engine::{Status, Step, Vm, VmState};
use crate::interpreter::errors::{RuntimeError, StructuralError};
use std::collections::VecDeque;
use tracing::debug;

pub struct Driver<H: Host> {
    vm: Vm<H>,
    pending: VecDeque<u8>,
}

impl<H: Host> Driver<H> {
    pub fn new(source: &str, host: H) -> Result<Self, StructuralError> {
        Ok(Driver {
            vm: Vm::new(source, host)?,
            pending: VecDeque::new(),
        })
    }

    /// Queue bytes for later `,` instructions
    pub fn feed(&mut self, bytes: &[u8]) {
        self.pending.extend(bytes.iter().copied());
    }

    /// Take back the most recently queued byte
    pub fn retract(&mut self) -> Option<u8> {
        self.pending.pop_back()
    }

    /// Run the VM, answering input requests from the queue while it lasts
    pub fn pump(&mut self) -> Result<Status, RuntimeError> {
        let mut status = self.vm.run()?;
        while status == Status::AwaitingInput {
            let Some(byte) = self.pending.pop_front() else {
                break;
            };
            status = self.vm.resume(byte)?;
        }
        Ok(status)
    }

    /// Execute one instruction, answering `,` from the queue when possible.
    ///
    /// A suspended VM with a queued byte consumes it as its step.
    pub fn step(&mut self) -> Result<Step, RuntimeError> {
        if self.vm.state() == VmState::AwaitingInput {
            return match self.pending.pop_front() {
                Some(byte) => self.resume_one(byte),
                None => Ok(Step::AwaitingInput),
            };
        }

        let step = self.vm.step()?;
        if step == Step::AwaitingInput {
            if let Some(byte) = self.pending.pop_front() {
                return self.resume_one(byte);
            }
        }
        Ok(step)
    }

    /// Hand one byte to the program.
    ///
    /// If the VM is waiting the byte is consumed immediately and execution
    /// continues, returning the new status. Otherwise the byte is queued for
    /// the next `,` and `None` is returned.
    pub fn deliver(&mut self, byte: u8) -> Result<Option<Status>, RuntimeError> {
        if self.vm.state() == VmState::AwaitingInput {
            self.vm.resume(byte)?;
            return self.pump().map(Some);
        }
        debug!("queued input byte {}", byte);
        self.pending.push_back(byte);
        Ok(None)
    }

    // Consume a queued byte without running past the ',' it answers.
    fn resume_one(&mut self, byte: u8) -> Result<Step, RuntimeError> {
        self.vm.accept_input(byte)?;
        if self.vm.program_counter() >= self.vm.program_len() {
            return self.vm.step();
        }
        Ok(Step::Continue)
    }

    /// Bytes typed ahead and not yet consumed
    pub fn pending(&self) -> &VecDeque<u8> {
        &self.pending
    }

    pub fn vm(&self) -> &Vm<H> {
        &self.vm
    }

    pub fn vm_mut(&mut self) -> &mut Vm<H> {
        &mut self.vm
    }

    pub fn into_vm(self) -> Vm<H> {
        self.vm
    }
}
