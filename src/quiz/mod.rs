pub mod category;
pub mod lesson;
pub mod problem;
