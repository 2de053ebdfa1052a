pub mod input;
pub mod quiz;
pub mod result;
