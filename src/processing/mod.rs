pub mod executive;
pub mod fallback;
pub mod metrics;
pub mod normalize;
