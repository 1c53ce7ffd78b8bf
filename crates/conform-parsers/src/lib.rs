pub mod project;
pub mod walker;
pub mod workflow;
