pub mod answer_field;
pub mod clue_card;
pub mod modal;
pub mod progress_bar;
pub mod results;
