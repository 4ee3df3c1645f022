pub mod error;
pub mod config;
pub mod compile;
pub mod vm;
pub mod table;
pub mod encode;
pub mod shorten;

pub use compile::{compile, Instruction, Program};
pub use config::Limits;
pub use encode::encode;
pub use error::{CompileError, EncodeError, ResourceKind, RuntimeError};
pub use shorten::shorten;
pub use table::TransitionTable;
pub use vm::{execute, execute_with_limits, ExecutionResult};
