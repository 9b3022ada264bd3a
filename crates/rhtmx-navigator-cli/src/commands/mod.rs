pub mod generate;
pub mod matching;
