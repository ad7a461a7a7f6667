pub mod day_first;
