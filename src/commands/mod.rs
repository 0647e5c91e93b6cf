pub mod insights;
pub mod overview;
pub mod query;
pub mod settings;
pub mod tasks;
pub mod upload;
