use crate::error::Result;
use crate::pixel::Pixel;
use crate::store::PixelStore;

/// Zero bytes sent before the first pixel.
pub const START_FRAME_LEN: usize = 4;

/// Fixed high bits of each pixel's brightness byte.
pub const BRIGHTNESS_PREFIX: u8 = 0b1110_0000;

/// Trailing byte that makes the LED chips latch.
pub const END_FRAME: u8 = 0xFF;

/// Build the APA102-style frame for the whole strip.
///
/// Layout: 4 zero bytes, then per pixel `0xE0 | brightness, blue, green, red`,
/// then a single `0xFF`. Fails if any slot was never set.
pub fn build_frame(store: &PixelStore) -> Result<Vec<u8>> {
    let pixels = store.to_pixels()?;

    let mut frame = Vec::with_capacity(START_FRAME_LEN + pixels.len() * 4 + 1);

    // Start frame
    frame.extend_from_slice(&[0x00; START_FRAME_LEN]);

    // Pixel data
    for pixel in &pixels {
        frame.extend_from_slice(&pixel_frame(pixel));
    }

    // End frame
    frame.push(END_FRAME);

    Ok(frame)
}

/// Wire bytes for one LED. Color order on the bus is B, G, R.
pub fn pixel_frame(pixel: &Pixel) -> [u8; 4] {
    [
        BRIGHTNESS_PREFIX | pixel.brightness,
        pixel.blue,
        pixel.green,
        pixel.red,
    ]
}
