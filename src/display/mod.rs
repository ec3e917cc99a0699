//! Human-readable rendering of collected measurements

pub mod formatter;
pub mod terminal;

pub use terminal::Terminal;
