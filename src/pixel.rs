/// Number of LEDs on the strip.
pub const NUM_PIXELS: usize = 8;

/// Largest value of the 5-bit brightness word.
pub const MAX_BRIGHTNESS: u8 = 0b11111;

// The encoder clocks out one bit per pixel slot, so more than 8 slots would
// shift past the top of a byte.
const _: () = assert!(NUM_PIXELS <= 8);

/// One LED: 8-bit color channels plus the 5-bit brightness word.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pixel {
    pub red: u8,
    pub green: u8,
    pub blue: u8,
    pub brightness: u8,
}

impl Pixel {
    /// White at full brightness, the power-on state of every slot.
    pub const WHITE: Pixel = Pixel {
        red: 255,
        green: 255,
        blue: 255,
        brightness: MAX_BRIGHTNESS,
    };

    pub fn new<C: Channel>(red: C, green: C, blue: C, brightness: u8) -> Self {
        Pixel {
            red: red.to_channel(),
            green: green.to_channel(),
            blue: blue.to_channel(),
            brightness: brightness & MAX_BRIGHTNESS,
        }
    }
}

/// A color value that can be stored in an 8-bit channel.
///
/// Values are truncated toward zero, then masked to 8 bits. This WRAPS rather
/// than clamps: 256 -> 0, -1 -> 255, 10.7 -> 10. Non-finite floats give 0.
pub trait Channel: Copy {
    fn to_channel(self) -> u8;
}

macro_rules! int_channel {
    ($($t:ty),*) => {
        $(
            impl Channel for $t {
                fn to_channel(self) -> u8 {
                    (self & 0xFF) as u8
                }
            }
        )*
    };
}

int_channel!(u8, i32, i64);

impl Channel for f64 {
    fn to_channel(self) -> u8 {
        let value = self.trunc();
        if !value.is_finite() {
            return 0;
        }
        value.rem_euclid(256.0) as u8
    }
}

impl Channel for f32 {
    fn to_channel(self) -> u8 {
        f64::from(self).to_channel()
    }
}

/// Convert a brightness fraction to the 5-bit brightness word.
///
/// Computes `trunc(31 * fraction) & 0b11111`. This WRAPS rather than clamps:
/// 1.2 -> 37 & 31 = 5, and negative fractions alias the same way (-0.5 -> 17).
/// Non-finite fractions give 0.
pub fn brightness_from_fraction(fraction: f64) -> u8 {
    let scaled = (31.0 * fraction).trunc();
    if !scaled.is_finite() {
        return 0;
    }
    // rem_euclid is the two's-complement mask for any finite magnitude
    scaled.rem_euclid(32.0) as u8
}
