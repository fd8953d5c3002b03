// Constants for the Brainfuck virtual machine

/// Number of cells on the tape
pub const TAPE_LENGTH: usize = 30_000;

/// Data pointer position when a VM is created
pub const INITIAL_DATA_POINTER: usize = 0;
