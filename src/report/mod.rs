pub mod png;
pub mod raster;
pub mod ufastqc;
pub mod uboxplot;
pub mod uscreen;
