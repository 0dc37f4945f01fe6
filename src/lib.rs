//! Consumer complaint analysis: CSV cleaning, filterable summaries and
//! semantic search over complaint narratives.

pub mod complaints;
pub mod config;
pub mod pipeline;
pub mod semantic;
pub mod summary;

#[cfg(test)]
mod tests;
