//! Port traits defining external boundaries.
//!
//! Each trait represents a boundary between the skill pipeline and an
//! external system (time, filesystem, shell, language model).
//! Implementations live in `src/adapters/`.

pub mod clock;
pub mod filesystem;
pub mod llm;
pub mod shell;

pub use clock::Clock;
pub use filesystem::FileSystem;
pub use llm::{CompletionFuture, CompletionRequest, CompletionResponse, LlmClient};
pub use shell::{ShellExecutor, ShellOutput};
