pub mod definition;
pub mod sport;
pub mod suggestion;
pub mod term;
pub mod term_of_the_day;
