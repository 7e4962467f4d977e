pub mod cities;
pub mod foncier;
pub mod geo;
