use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

/// Structural failures found while compiling program text.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CompileError {
    /// A `]` with no open `[` before it. `position` is the character offset.
    #[error("closing ']' at position {position} has no matching '['")]
    UnmatchedCloseBracket { position: usize },

    /// Brackets still open when the text ran out.
    #[error("there are {count} more '[' than ']'")]
    UnmatchedOpenBracket { count: usize },
}

/// Which resource ceiling a runaway program tripped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceKind {
    Instructions,
    MemoryCells,
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResourceKind::Instructions => f.write_str("instructions"),
            ResourceKind::MemoryCells => f.write_str("memory cells"),
        }
    }
}

/// Terminal failures raised by the virtual machine.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RuntimeError {
    /// An input instruction ran but the caller supplied no inputs.
    #[error("input instruction at position {position} but no inputs were given")]
    MissingInput { position: usize },

    #[error("program exceeded the maximum number of {kind} allowed ({limit})")]
    ResourceExceeded { kind: ResourceKind, limit: usize },
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EncodeError {
    /// Cells hold 8-bit values, so only U+0000..=U+00FF can be printed.
    #[error("character {ch:?} at position {position} does not fit in a cell")]
    UnencodableChar { ch: char, position: usize },
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_carry_context() {
        let err = CompileError::UnmatchedCloseBracket { position: 7 };
        assert_eq!(err.to_string(), "closing ']' at position 7 has no matching '['");

        let err = RuntimeError::ResourceExceeded {
            kind: ResourceKind::MemoryCells,
            limit: 30_000,
        };
        assert_eq!(
            err.to_string(),
            "program exceeded the maximum number of memory cells allowed (30000)"
        );
    }
}
