pub mod agent;
pub mod summary;
