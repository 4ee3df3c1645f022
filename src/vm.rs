use std::collections::HashMap;

use serde::Serialize;
use tracing::debug;

use crate::compile::{Instruction, Program};
use crate::config::Limits;
use crate::error::{ResourceKind, RuntimeError};

/// Outcome of a run that halted normally.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExecutionResult {
    /// Every cell value printed, as Latin-1 code points.
    pub output: String,
    pub instructions_executed: usize,
    /// Distinct cells read or written during the run.
    pub memory_cells_used: usize,
}

/// Sparse tape. Any cell read or written counts as touched.
struct Memory {
    cells: HashMap<isize, i8>,
}

impl Memory {
    fn new() -> Self {
        Self {
            cells: HashMap::new(),
        }
    }

    fn get(&mut self, addr: isize) -> i8 {
        *self.cells.entry(addr).or_insert(0)
    }

    fn add(&mut self, addr: isize, delta: i8) {
        let cell = self.cells.entry(addr).or_insert(0);
        *cell = cell.wrapping_add(delta);
    }

    fn set(&mut self, addr: isize, value: i8) {
        self.cells.insert(addr, value);
    }

    fn touched(&self) -> usize {
        self.cells.len()
    }
}

/// Run `program` with the default [`Limits`].
///
/// `inputs` feed `,` instructions round-robin; each value is truncated to
/// 8 bits.
pub fn execute(program: &Program, inputs: &[i64]) -> Result<ExecutionResult, RuntimeError> {
    execute_with_limits(program, inputs, Limits::default())
}

/// Run `program` from a fresh tape, aborting once either ceiling in
/// `limits` is crossed. An aborted run returns only the error.
pub fn execute_with_limits(
    program: &Program,
    inputs: &[i64],
    limits: Limits,
) -> Result<ExecutionResult, RuntimeError> {
    let code = program.instructions();
    let mut memory = Memory::new();
    let mut output = String::new();

    let mut pc: usize = 0;
    let mut ptr: isize = 0;
    let mut executed: usize = 0;
    let mut next_input: usize = 0;

    while let Some(&instruction) = code.get(pc) {
        if executed >= limits.max_instructions {
            return Err(RuntimeError::ResourceExceeded {
                kind: ResourceKind::Instructions,
                limit: limits.max_instructions,
            });
        }

        match instruction {
            Instruction::MovePointer(d) => ptr = ptr.wrapping_add(d),
            Instruction::MutateCell(d) => memory.add(ptr, d),
            Instruction::Output => output.push(char::from(memory.get(ptr) as u8)),
            Instruction::Input => {
                if inputs.is_empty() {
                    return Err(RuntimeError::MissingInput { position: pc });
                }
                memory.set(ptr, inputs[next_input] as i8);
                next_input = (next_input + 1) % inputs.len();
            }
            Instruction::JumpIfZero(target) => {
                if memory.get(ptr) == 0 {
                    pc = target;
                    executed += 1;
                    continue;
                }
            }
            Instruction::JumpIfNotZero(target) => {
                if memory.get(ptr) != 0 {
                    pc = target;
                    executed += 1;
                    continue;
                }
            }
            Instruction::End => {
                debug!(pc, executed, "program reached end instruction");
                return Ok(ExecutionResult {
                    output,
                    instructions_executed: executed + 1,
                    memory_cells_used: memory.touched(),
                });
            }
        }

        pc += 1;
        executed += 1;

        if memory.touched() > limits.max_memory_cells {
            return Err(RuntimeError::ResourceExceeded {
                kind: ResourceKind::MemoryCells,
                limit: limits.max_memory_cells,
            });
        }
    }

    debug!(
        executed,
        cells = memory.touched(),
        output_len = output.len(),
        "program halted"
    );
    Ok(ExecutionResult {
        output,
        instructions_executed: executed,
        memory_cells_used: memory.touched(),
    })
}


#[cfg(test)]
mod proptests {
    use super::*;
    use crate::compile::compile;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn random_programs_respect_instruction_limit(
            text in "[-+<>.,\\[\\]]{0,64}",
            limit in 1usize..2000
        ) {
            if let Ok(program) = compile(&text) {
                let limits = Limits { max_instructions: limit, max_memory_cells: 100 };
                match execute_with_limits(&program, &[3, 1], limits) {
                    Ok(result) => {
                        prop_assert!(result.instructions_executed <= limit);
                        prop_assert!(result.memory_cells_used <= 100);
                    }
                    Err(RuntimeError::ResourceExceeded { .. }) => {}
                    Err(other) => prop_assert!(false, "unexpected error {}", other),
                }
            }
        }
    }
}
