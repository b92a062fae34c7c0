use crate::error::{BlinktError, Result};
use crate::pixel::{brightness_from_fraction, Channel, Pixel, MAX_BRIGHTNESS, NUM_PIXELS};

/// Logical state of the strip: one slot per LED, index 0 first on the bus.
///
/// A slot is `None` until it is first written. `initialize` fills every slot
/// with white at full brightness.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PixelStore {
    pixels: [Option<Pixel>; NUM_PIXELS],
}

impl PixelStore {
    /// Store with every slot unset. Call `initialize` before transmitting.
    pub fn new() -> Self {
        PixelStore {
            pixels: [None; NUM_PIXELS],
        }
    }

    /// Store with every slot white at full brightness.
    pub fn initialized() -> Self {
        let mut store = Self::new();
        store.initialize();
        store
    }

    /// Reset all slots to white at full brightness.
    pub fn initialize(&mut self) {
        self.pixels = [Some(Pixel::WHITE); NUM_PIXELS];
    }

    /// Set one pixel's color and, optionally, its brightness.
    ///
    /// Colors are truncated toward zero and wrap to 8 bits. When `brightness` is `None` the slot keeps its
    /// current brightness word, or gets full brightness if it was never set.
    pub fn set_pixel<C: Channel>(
        &mut self,
        index: usize,
        r: C,
        g: C,
        b: C,
        brightness: Option<f64>,
    ) -> Result<()> {
        write_slot(self.slot_mut(index)?, r, g, b, brightness);
        Ok(())
    }

    /// `set_pixel` on every index with the same arguments.
    pub fn set_all_pixels<C: Channel>(&mut self, r: C, g: C, b: C, brightness: Option<f64>) {
        for slot in self.pixels.iter_mut() {
            write_slot(slot, r, g, b, brightness);
        }
    }

    /// Update only the brightness word of an already-set pixel.
    pub fn set_brightness(&mut self, index: usize, fraction: f64) -> Result<()> {
        match self.slot_mut(index)? {
            Some(pixel) => {
                pixel.brightness = brightness_from_fraction(fraction);
                Ok(())
            }
            None => Err(BlinktError::PixelNotInitialized { index }),
        }
    }

    /// Set every pixel to white, keeping each pixel's brightness.
    ///
    /// Not the same as `set_all_pixels(255, 255, 255, Some(1.0))`.
    pub fn clear_all(&mut self) {
        self.set_all_pixels(255, 255, 255, None);
    }

    pub fn pixel(&self, index: usize) -> Result<Option<Pixel>> {
        self.pixels
            .get(index)
            .copied()
            .ok_or(BlinktError::IndexOutOfRange { index })
    }

    /// Always `NUM_PIXELS`; the strip has a fixed size.
    #[allow(clippy::len_without_is_empty)]
    pub fn len(&self) -> usize {
        NUM_PIXELS
    }

    /// True once every slot holds a value.
    pub fn is_initialized(&self) -> bool {
        self.pixels.iter().all(Option::is_some)
    }

    pub fn iter(&self) -> impl Iterator<Item = Option<Pixel>> + '_ {
        self.pixels.iter().copied()
    }

    /// All pixels in bus order, or the first unset index.
    pub fn to_pixels(&self) -> Result<[Pixel; NUM_PIXELS]> {
        let mut out = [Pixel::WHITE; NUM_PIXELS];
        for (index, slot) in self.pixels.iter().enumerate() {
            out[index] = slot.ok_or(BlinktError::PixelNotInitialized { index })?;
        }
        Ok(out)
    }

    fn slot_mut(&mut self, index: usize) -> Result<&mut Option<Pixel>> {
        self.pixels
            .get_mut(index)
            .ok_or(BlinktError::IndexOutOfRange { index })
    }
}

fn write_slot<C: Channel>(slot: &mut Option<Pixel>, r: C, g: C, b: C, brightness: Option<f64>) {
    let brightness = match brightness {
        Some(fraction) => brightness_from_fraction(fraction),
        None => slot.map(|p| p.brightness).unwrap_or(MAX_BRIGHTNESS),
    };
    *slot = Some(Pixel::new(r, g, b, brightness));
}
