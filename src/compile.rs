use std::fmt;

use crate::error::CompileError;

const LESS: char = '<';
const GREATER: char = '>';
const MINUS: char = '-';
const PLUS: char = '+';
const DOT: char = '.';
const COMMA: char = ',';
const LBRACKET: char = '[';
const RBRACKET: char = ']';

/// A single resolved instruction.
///
/// Jump targets are instruction indices fixed at compile time:
/// a `JumpIfZero` lands just past its matching `JumpIfNotZero`, and a
/// `JumpIfNotZero` lands just past its matching `JumpIfZero`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Instruction {
    /// Add a signed displacement to the data pointer (`>` / `<`).
    MovePointer(isize),
    /// Add a wrapping delta to the current cell (`+` / `-`).
    MutateCell(i8),
    /// `.`
    Output,
    /// `,`
    Input,
    /// `[`
    JumpIfZero(usize),
    /// `]`
    JumpIfNotZero(usize),
    /// Stop immediately. Never produced by [`compile`].
    End,
}

/// A compiled program: the instruction sequence plus the text it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Program {
    source: String,
    instructions: Vec<Instruction>,
}

impl Program {
    /// Wrap a hand-assembled instruction sequence. Jump targets are taken as
    /// given; the VM treats an out-of-range target as running off the end.
    pub fn from_instructions(instructions: Vec<Instruction>) -> Self {
        Self {
            source: String::new(),
            instructions,
        }
    }

    pub fn instructions(&self) -> &[Instruction] {
        &self.instructions
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn len(&self) -> usize {
        self.instructions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instructions.is_empty()
    }
}

impl fmt::Display for Program {
    /// One instruction per line, prefixed with its index.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, ins) in self.instructions.iter().enumerate() {
            match ins {
                Instruction::MovePointer(d) => writeln!(f, "{i:04}: ptr {d:+}")?,
                Instruction::MutateCell(d) => writeln!(f, "{i:04}: add {d:+}")?,
                Instruction::Output => writeln!(f, "{i:04}: out")?,
                Instruction::Input => writeln!(f, "{i:04}: in")?,
                Instruction::JumpIfZero(t) => writeln!(f, "{i:04}: jz {t:04}")?,
                Instruction::JumpIfNotZero(t) => writeln!(f, "{i:04}: jnz {t:04}")?,
                Instruction::End => writeln!(f, "{i:04}: end")?,
            }
        }
        Ok(())
    }
}

/// Compile program text into a [`Program`].
///
/// Characters outside `<>+-.,[]` are ignored. Only bracket balance is
/// checked; pointer range and input availability are left to the VM.
pub fn compile(text: &str) -> Result<Program, CompileError> {
    let mut instructions = Vec::new();
    let mut open = Vec::new();

    for (position, ch) in text.chars().enumerate() {
        match ch {
            GREATER => instructions.push(Instruction::MovePointer(1)),
            LESS => instructions.push(Instruction::MovePointer(-1)),
            PLUS => instructions.push(Instruction::MutateCell(1)),
            MINUS => instructions.push(Instruction::MutateCell(-1)),
            DOT => instructions.push(Instruction::Output),
            COMMA => instructions.push(Instruction::Input),
            LBRACKET => {
                open.push(instructions.len());
                instructions.push(Instruction::JumpIfZero(0));
            }
            RBRACKET => {
                let start = open
                    .pop()
                    .ok_or(CompileError::UnmatchedCloseBracket { position })?;
                instructions.push(Instruction::JumpIfNotZero(start + 1));
                instructions[start] = Instruction::JumpIfZero(instructions.len());
            }
            _ => {}
        }
    }

    if !open.is_empty() {
        return Err(CompileError::UnmatchedOpenBracket { count: open.len() });
    }

    Ok(Program {
        source: text.to_owned(),
        instructions,
    })
}
