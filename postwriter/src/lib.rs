// Library interface for postwriter modules
// This allows tests and other binaries to import modules

pub mod error;
pub mod generator;
pub mod llm;
pub mod news;
pub mod server;
