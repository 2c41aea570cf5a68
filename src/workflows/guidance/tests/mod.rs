mod common;
mod matching;
mod orchestrator;
