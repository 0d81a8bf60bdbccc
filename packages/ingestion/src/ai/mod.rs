//! Reference Analyzer implementations.

pub mod gemini;

pub use gemini::GeminiAnalyzer;
