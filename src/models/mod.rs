pub mod agence;
pub mod appartement;
pub mod bien;
pub mod listing;
pub mod listing_agence;
pub mod maison;
pub mod ville;
