pub mod links;
pub mod parse;
#[allow(clippy::module_inception)]
pub mod paruvendu;
