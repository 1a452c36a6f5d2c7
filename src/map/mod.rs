mod projection;
mod renderer;

pub use projection::Viewport;
pub use renderer::{BaseMap, LineString, Lod, MapLayers, MarkerCell};
