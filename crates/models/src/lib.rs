pub mod role;
pub mod status;
pub mod visibility;
pub mod workflow;
