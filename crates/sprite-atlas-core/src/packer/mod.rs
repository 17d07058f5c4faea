pub mod heuristic;
pub mod maxrects;

pub use maxrects::RectBin;
