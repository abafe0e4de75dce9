pub mod describe;
pub mod token;
