pub mod category;
pub mod episode;
pub mod film;
