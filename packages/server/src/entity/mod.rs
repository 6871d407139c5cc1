pub mod category;
pub mod definition;
pub mod sport;
pub mod suggested_term;
pub mod term;
pub mod term_category;
pub mod term_of_the_day;
pub mod vote;
