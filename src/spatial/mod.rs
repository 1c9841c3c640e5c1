pub mod attraction;
pub mod density;
pub mod geometry;
pub mod toroidal;

pub use attraction::{AttractionClusterer, GroupingMode};
pub use density::DensityClusterer;
pub use geometry::ClusterGeometry;
pub use toroidal::{distance, distance_vector, DistanceVector};
