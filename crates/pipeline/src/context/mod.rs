//! Context assembly: budgeting, formatting, and the assembler itself.

pub mod assembler;
pub mod budget;
pub mod format;

pub use assembler::{ContextAssembler, RetrievalLimits};
pub use budget::{Selection, SourceStats, take_within_budget};
