//! Fairlock contract toolkit - script construction and evaluation.
//!
//! Provides the Script type, opcode definitions, script chunk parsing,
//! the fluent ScriptBuilder, and the script interpreter engine used to
//! verify spends.

pub mod builder;
pub mod chunk;
pub mod interpreter;
pub mod opcodes;
pub mod script;

mod error;
pub use builder::ScriptBuilder;
pub use chunk::ScriptChunk;
pub use error::ScriptError;
pub use script::Script;
