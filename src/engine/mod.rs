pub mod merge;
pub mod order;
pub mod scoring;
