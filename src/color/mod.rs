mod blend;
mod hsv;

pub use blend::{
    blend_frames, blend_hsv, blend_hue_aware, blend_linear, clamp_channel, scale, scale_frame,
};
pub use hsv::{Hsv, hsv_to_rgb, rgb_to_hsv};
use smart_leds::RGB8;

pub type Rgb = RGB8;

/// All channels off
pub const BLACK: Rgb = Rgb { r: 0, g: 0, b: 0 };
