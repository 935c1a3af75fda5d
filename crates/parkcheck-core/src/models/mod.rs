pub mod features;
pub mod label;
pub mod reading;
pub mod transcript;
