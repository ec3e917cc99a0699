//! System interface abstractions for testing and development

pub mod commands;
pub mod filesystem;
pub mod platform;

// Re-export commonly used traits
pub use commands::CommandExecutor;
pub use filesystem::FilesystemReader;
pub use platform::Platform;
