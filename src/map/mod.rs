pub mod layer;
pub mod map;
pub mod projection;
