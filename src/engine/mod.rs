pub mod evaluate;
pub mod scoring;
