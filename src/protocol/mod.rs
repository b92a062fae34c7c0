pub mod apa102;

pub use apa102::{build_frame, BRIGHTNESS_PREFIX, END_FRAME, START_FRAME_LEN};
