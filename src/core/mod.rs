pub mod error;
pub mod input;
pub mod matrix_profile;
