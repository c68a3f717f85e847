pub mod interpreter;
pub mod orchestrator;
