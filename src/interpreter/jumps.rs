//! Bracket validation and jump resolution
//!
//! Matching brackets are found once, when the VM is built, with a LIFO scan:
//! each `[` pushes its position, each `]` pops the innermost open `[`. A `]`
//! that finds the stack empty, or a `[` left on the stack at the end, makes the
//! program structurally invalid. The pairs found along the way are kept so that
//! every taken jump is a single map lookup.

use crate::interpreter::errors::StructuralError;
use rustc_hash::FxHashMap;

/// Index-to-index map between matching `[` and `]`
#[derive(Debug, Clone, Default)]
pub struct JumpTable {
    partners: FxHashMap<usize, usize>,
}

impl JumpTable {
    /// Validate the bracket structure of `program` and pair every bracket.
    pub fn build(program: &[char]) -> Result<Self, StructuralError> {
        let mut open: Vec<usize> = Vec::new();
        let mut partners = FxHashMap::default();

        for (position, &c) in program.iter().enumerate() {
            match c {
                '[' => open.push(position),
                ']' => {
                    let start = open
                        .pop()
                        .ok_or(StructuralError::UnmatchedClose { position })?;
                    partners.insert(start, position);
                    partners.insert(position, start);
                }
                _ => {}
            }
        }

        if let Some(&position) = open.last() {
            return Err(StructuralError::UnclosedOpen { position });
        }

        Ok(JumpTable { partners })
    }

    /// Position of the bracket matching the one at `index`
    pub fn partner(&self, index: usize) -> Option<usize> {
        self.partners.get(&index).copied()
    }

    /// Number of bracket pairs in the program
    pub fn pairs(&self) -> usize {
        self.partners.len() / 2
    }
}
