//! Driver for the Pimoroni Blinkt! strip: 8 APA102-style LEDs bit-banged over
//! two GPIO lines.
//!
//! Mutate a [`PixelStore`] (or a [`Blinkt`] driver, which owns one), then
//! transmit it with [`FrameEncoder`] through any [`Port`]. Color and
//! brightness values wrap to their field widths instead of clamping.

pub mod blinkt;
pub mod config;
pub mod encoder;
pub mod error;
pub mod gpio;
pub mod pixel;
pub mod port;
pub mod protocol;
pub mod store;

pub use crate::blinkt::{Blinkt, GpioPort};
pub use crate::config::{Config, GpioConfig};
pub use crate::encoder::FrameEncoder;
pub use crate::error::{BlinktError, Result};
pub use crate::pixel::{Channel, Pixel, MAX_BRIGHTNESS, NUM_PIXELS};
pub use crate::port::{PinPort, Port, RecordingPort};
pub use crate::store::PixelStore;
