pub mod ai;
pub mod canvas_ops;
pub mod clipboard;
pub mod flood;
pub mod raster;
pub mod transform;
