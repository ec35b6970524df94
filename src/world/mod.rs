mod camera;
mod map;
mod texture;

pub use camera::Pose;

pub use map::{GridMap, HitResult, MapError, RayCastMap, Tile};

pub use texture::{
    NO_TEXTURE, Rgb, Texture, TextureBank, TextureError, TextureId, TextureSource, uv_gradient,
};
