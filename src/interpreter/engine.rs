// Execution engine for the Brainfuck virtual machine

use crate::host::Host;
use crate::interpreter::errors::{RuntimeError, StructuralError};
use crate::interpreter::jumps::JumpTable;
use crate::memory::Tape;
use std::fmt;
use tracing::{debug, trace, warn};

/// The eight meaningful characters of the language
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Instruction {
    /// `<`
    Left,
    /// `>`
    Right,
    /// `+`
    Increment,
    /// `-`
    Decrement,
    /// `.`
    Output,
    /// `,`
    Input,
    /// `[`
    LoopStart,
    /// `]`
    LoopEnd,
}

impl Instruction {
    /// Decode a source character; anything else is a comment
    pub fn decode(c: char) -> Option<Self> {
        match c {
            '<' => Some(Instruction::Left),
            '>' => Some(Instruction::Right),
            '+' => Some(Instruction::Increment),
            '-' => Some(Instruction::Decrement),
            '.' => Some(Instruction::Output),
            ',' => Some(Instruction::Input),
            '[' => Some(Instruction::LoopStart),
            ']' => Some(Instruction::LoopEnd),
            _ => None,
        }
    }
}

/// Lifecycle of a VM
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VmState {
    /// Constructed, no instruction executed yet
    Ready,
    /// Executing (or paused between single steps)
    Running,
    /// Suspended on `,` until [`Vm::resume`] delivers a byte
    AwaitingInput,
    /// Program counter reached the end of the program
    Halted,
    /// A fatal error occurred; the VM must be discarded
    Faulted,
}

impl fmt::Display for VmState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            VmState::Ready => "ready",
            VmState::Running => "running",
            VmState::AwaitingInput => "awaiting input",
            VmState::Halted => "halted",
            VmState::Faulted => "faulted",
        };
        f.write_str(name)
    }
}

/// Why [`Vm::run`] or [`Vm::resume`] returned control to the caller
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Halted,
    AwaitingInput,
}

/// Outcome of a single [`Vm::step`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// One instruction executed; more remain
    Continue,
    AwaitingInput,
    Halted,
}

/// A resumable Brainfuck virtual machine
///
/// The VM interprets the source text directly. `run` executes until the
/// program ends or reaches `,`; in the second case it returns
/// [`Status::AwaitingInput`] and the caller later hands over a byte with
/// `resume`. Each VM runs exactly one program and is then discarded.
pub struct Vm<H: Host> {
    /// Source text, one entry per character
    program: Vec<char>,

    /// Matching bracket positions
    jumps: JumpTable,

    /// Cells and data pointer
    tape: Tape,

    /// Index of the next instruction to execute
    pc: usize,

    state: VmState,

    /// Output sink and input-request notifier
    host: H,

    /// Instructions executed so far, comments included
    executed: u64,
}

impl<H: Host> Vm<H> {
    /// Create a VM for `source`, rejecting programs with unbalanced brackets
    pub fn new(source: &str, host: H) -> Result<Self, StructuralError> {
        let program: Vec<char> = source.chars().collect();
        let jumps = JumpTable::build(&program)?;

        debug!(
            "VM created: {} characters, {} loops",
            program.len(),
            jumps.pairs()
        );

        Ok(Vm {
            program,
            jumps,
            tape: Tape::new(),
            pc: 0,
            state: VmState::Ready,
            host,
            executed: 0,
        })
    }

    /// Run until the program halts or asks for input
    pub fn run(&mut self) -> Result<Status, RuntimeError> {
        match self.state {
            VmState::Faulted => return Err(RuntimeError::Faulted),
            VmState::Halted => return Ok(Status::Halted),
            VmState::AwaitingInput => return Ok(Status::AwaitingInput),
            VmState::Ready | VmState::Running => {}
        }

        loop {
            match self.step()? {
                Step::Continue => {}
                Step::AwaitingInput => return Ok(Status::AwaitingInput),
                Step::Halted => return Ok(Status::Halted),
            }
        }
    }

    /// Deliver one input byte to a VM suspended on `,` and keep running
    pub fn resume(&mut self, byte: u8) -> Result<Status, RuntimeError> {
        self.accept_input(byte)?;
        self.run()
    }

    /// Store an input byte and move past the `,` without executing further
    pub(crate) fn accept_input(&mut self, byte: u8) -> Result<(), RuntimeError> {
        match self.state {
            VmState::AwaitingInput => {}
            VmState::Faulted => return Err(RuntimeError::Faulted),
            state => return Err(RuntimeError::NotAwaitingInput { state }),
        }

        debug!("resuming at {} with byte {}", self.pc, byte);
        self.tape.store(byte);
        // pc still points at the ',' that suspended us
        self.pc += 1;
        self.state = VmState::Running;
        self.host.input_satisfied();
        Ok(())
    }

    /// Execute exactly one instruction
    pub fn step(&mut self) -> Result<Step, RuntimeError> {
        match self.state {
            VmState::Faulted => return Err(RuntimeError::Faulted),
            VmState::Halted => return Ok(Step::Halted),
            VmState::AwaitingInput => return Ok(Step::AwaitingInput),
            VmState::Ready => self.state = VmState::Running,
            VmState::Running => {}
        }

        let Some(&c) = self.program.get(self.pc) else {
            return Ok(self.halt());
        };

        trace!("pc={} dp={} op={:?}", self.pc, self.tape.pointer(), c);
        self.executed += 1;

        if let Err(e) = self.execute(c) {
            warn!("VM faulted: {}", e);
            self.state = VmState::Faulted;
            return Err(e);
        }

        if self.state == VmState::AwaitingInput {
            return Ok(Step::AwaitingInput);
        }

        if self.pc >= self.program.len() {
            return Ok(self.halt());
        }

        Ok(Step::Continue)
    }

    fn execute(&mut self, c: char) -> Result<(), RuntimeError> {
        let Some(instruction) = Instruction::decode(c) else {
            self.pc += 1;
            return Ok(());
        };

        match instruction {
            Instruction::Left => {
                self.tape.move_left(self.pc)?;
                self.pc += 1;
            }
            Instruction::Right => {
                self.tape.move_right(self.pc)?;
                self.pc += 1;
            }
            Instruction::Increment => {
                self.tape.increment();
                self.pc += 1;
            }
            Instruction::Decrement => {
                self.tape.decrement();
                self.pc += 1;
            }
            Instruction::Output => {
                self.host.output(self.tape.current());
                self.pc += 1;
            }
            Instruction::Input => {
                debug!("suspended for input at {}", self.pc);
                self.state = VmState::AwaitingInput;
                self.host.input_requested();
            }
            Instruction::LoopStart => {
                if self.tape.current() == 0 {
                    self.pc = self.jump_target() + 1;
                } else {
                    self.pc += 1;
                }
            }
            Instruction::LoopEnd => {
                if self.tape.current() != 0 {
                    self.pc = self.jump_target() + 1;
                } else {
                    self.pc += 1;
                }
            }
        }

        Ok(())
    }

    /// Matching bracket for the one under the program counter
    fn jump_target(&self) -> usize {
        // Every bracket was paired when the table was built.
        self.jumps.partner(self.pc).unwrap_or(self.pc)
    }

    fn halt(&mut self) -> Step {
        if self.state != VmState::Halted {
            debug!("halted after {} instructions", self.executed);
        }
        self.state = VmState::Halted;
        Step::Halted
    }

    pub fn state(&self) -> VmState {
        self.state
    }

    pub fn program_counter(&self) -> usize {
        self.pc
    }

    pub fn data_pointer(&self) -> usize {
        self.tape.pointer()
    }

    /// Number of characters in the program
    pub fn program_len(&self) -> usize {
        self.program.len()
    }

    pub fn instructions_executed(&self) -> u64 {
        self.executed
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn into_host(self) -> H {
        self.host
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::CapturedOutput;

    fn vm(source: &str) -> Vm<CapturedOutput> {
        Vm::new(source, CapturedOutput::new()).expect("valid program")
    }

    #[test]
    fn test_empty_program_halts_immediately() {
        let mut vm = vm("");
        assert_eq!(vm.state(), VmState::Ready);
        assert_eq!(vm.run(), Ok(Status::Halted));
        assert_eq!(vm.instructions_executed(), 0);
    }

    #[test]
    fn test_first_step_enters_running() {
        let mut vm = vm("++");
        assert_eq!(vm.step(), Ok(Step::Continue));
        assert_eq!(vm.state(), VmState::Running);
        assert_eq!(vm.step(), Ok(Step::Halted));
        assert_eq!(vm.state(), VmState::Halted);
        assert_eq!(vm.tape.current(), 2);
    }

    #[test]
    fn test_empty_loop_over_zero_is_skipped() {
        let mut vm = vm("[]+");
        assert_eq!(vm.step(), Ok(Step::Continue));
        assert_eq!(vm.program_counter(), 2);
        assert_eq!(vm.tape.current(), 0);
        assert_eq!(vm.run(), Ok(Status::Halted));
        assert_eq!(vm.tape.current(), 1);
    }

    #[test]
    fn test_loop_end_jumps_past_matching_start() {
        let mut vm = vm("++[-]");
        vm.step().unwrap();
        vm.step().unwrap();
        vm.step().unwrap(); // '[' enters
        vm.step().unwrap(); // '-'
        assert_eq!(vm.program_counter(), 4);
        vm.step().unwrap(); // ']' jumps back
        assert_eq!(vm.program_counter(), 3);
        assert_eq!(vm.run(), Ok(Status::Halted));
        assert_eq!(vm.tape.current(), 0);
    }

    #[test]
    fn test_comments_only_advance_pc() {
        let mut vm = vm("ab+c");
        assert_eq!(vm.step(), Ok(Step::Continue));
        assert_eq!(vm.program_counter(), 1);
        assert_eq!(vm.tape.current(), 0);
        assert_eq!(vm.run(), Ok(Status::Halted));
        assert_eq!(vm.tape.current(), 1);
    }

    #[test]
    fn test_input_suspends_without_advancing() {
        let mut vm = vm("+,+");
        assert_eq!(vm.run(), Ok(Status::AwaitingInput));
        assert_eq!(vm.program_counter(), 1);
        assert!(vm.host().is_waiting());

        // run while waiting neither re-notifies nor moves
        assert_eq!(vm.run(), Ok(Status::AwaitingInput));
        assert_eq!(vm.host().input_requests(), 1);

        assert_eq!(vm.resume(9), Ok(Status::Halted));
        assert_eq!(vm.tape.current(), 10);
        assert!(!vm.host().is_waiting());
    }

    #[test]
    fn test_fault_stops_execution() {
        let mut vm = vm("<+");
        assert_eq!(vm.run(), Err(RuntimeError::TapeUnderflow { pc: 0 }));
        assert_eq!(vm.state(), VmState::Faulted);
        assert_eq!(vm.tape.current(), 0);
        assert_eq!(vm.run(), Err(RuntimeError::Faulted));
        assert_eq!(vm.resume(1), Err(RuntimeError::Faulted));
    }

    #[test]
    fn test_multibyte_characters_are_single_positions() {
        let mut vm = vm("é+");
        assert_eq!(vm.program_len(), 2);
        assert_eq!(vm.run(), Ok(Status::Halted));
        assert_eq!(vm.tape.current(), 1);
    }
}
