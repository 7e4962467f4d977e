pub mod cerema;
pub mod reference;
pub mod retry;
pub mod wikidata;
