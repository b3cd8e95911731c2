pub mod geometry;
pub mod records;
pub mod retriever;
