pub mod definition;
pub mod shared;
pub mod sport;
pub mod suggestion;
pub mod term;
