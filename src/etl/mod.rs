pub mod agencies;
pub mod cities;
pub mod normalize;
pub mod transform;
