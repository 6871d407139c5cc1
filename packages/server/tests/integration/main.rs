
mod suggestion;
mod term;
mod vote;
