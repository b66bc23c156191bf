pub mod common;
pub mod distance_profile;
pub mod motifs;
pub mod naive;
