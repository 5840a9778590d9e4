pub mod angle;
pub mod ops;
pub mod pose;
