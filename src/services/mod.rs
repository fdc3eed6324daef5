pub mod ai;
pub mod availability;
pub mod calendar;
pub mod committer;
pub mod directive;
pub mod messaging;
pub mod orchestrator;
