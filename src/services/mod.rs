pub mod listing;
pub mod mutation;
pub mod quiz;
