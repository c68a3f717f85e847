pub mod raster;
pub mod screen;
