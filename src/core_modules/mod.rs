pub mod color_metric;
pub mod cut_optimizer;
pub mod overlay;
pub mod pixel;
pub mod quantizer;
pub mod ray;
pub mod region;
pub mod region_map;
pub mod utils;
