//! Tape memory with a bounds-checked data pointer

use crate::interpreter::constants::{INITIAL_DATA_POINTER, TAPE_LENGTH};
use crate::interpreter::errors::RuntimeError;

/// Fixed-length byte tape owned by a single VM
#[derive(Debug, Clone)]
pub struct Tape {
    cells: Box<[u8]>,
    pointer: usize,
}

impl Tape {
    /// Create a zeroed tape with the pointer on the first cell
    pub fn new() -> Self {
        Tape {
            cells: vec![0u8; TAPE_LENGTH].into_boxed_slice(),
            pointer: INITIAL_DATA_POINTER,
        }
    }

    /// Index of the addressed cell
    pub fn pointer(&self) -> usize {
        self.pointer
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Move the pointer one cell to the left.
    ///
    /// `pc` is the position of the instruction doing the move and is only
    /// used to build the error.
    pub fn move_left(&mut self, pc: usize) -> Result<(), RuntimeError> {
        match self.pointer.checked_sub(1) {
            Some(next) => {
                self.pointer = next;
                Ok(())
            }
            None => Err(RuntimeError::TapeUnderflow { pc }),
        }
    }

    /// Move the pointer one cell to the right.
    pub fn move_right(&mut self, pc: usize) -> Result<(), RuntimeError> {
        let next = self.pointer + 1;
        if next >= self.cells.len() {
            return Err(RuntimeError::TapeOverflow { pc });
        }
        self.pointer = next;
        Ok(())
    }

    pub fn increment(&mut self) {
        let cell = &mut self.cells[self.pointer];
        *cell = cell.wrapping_add(1);
    }

    pub fn decrement(&mut self) {
        let cell = &mut self.cells[self.pointer];
        *cell = cell.wrapping_sub(1);
    }

    /// Value of the addressed cell
    pub fn current(&self) -> u8 {
        self.cells[self.pointer]
    }

    /// Value of the addressed cell read as a signed byte
    pub fn current_signed(&self) -> i8 {
        i8::from_ne_bytes([self.current()])
    }

    /// Overwrite the addressed cell
    pub fn store(&mut self, value: u8) {
        self.cells[self.pointer] = value;
    }
}

impl Default for Tape {
    fn default() -> Self {
        Self::new()
    }
}
