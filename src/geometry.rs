pub mod mesh;
pub mod primitives;
