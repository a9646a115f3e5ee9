pub mod result;
pub mod scramble;
pub mod state;
