use log::debug;

use crate::config::GpioConfig;
use crate::encoder::FrameEncoder;
use crate::error::Result;
use crate::gpio::SysfsPin;
use crate::pixel::Channel;
use crate::port::{PinPort, Port};
use crate::store::PixelStore;

/// Port backed by two sysfs GPIO pins.
pub type GpioPort = PinPort<SysfsPin, SysfsPin>;

/// Blinkt! strip driver: pixel state plus the port it is clocked out on.
///
/// Setters only change local state. Nothing reaches the LEDs until `show`.
pub struct Blinkt<P: Port> {
    store: PixelStore,
    port: P,
    encoder: FrameEncoder,
}

impl Blinkt<GpioPort> {
    /// Open the clock and data pins named in `config`.
    pub fn open(config: &GpioConfig) -> Result<Self> {
        let clock = SysfsPin::open(&config.sysfs_root, config.clock_pin, config.unexport_on_drop)?;
        let data = SysfsPin::open(&config.sysfs_root, config.data_pin, config.unexport_on_drop)?;

        debug!(
            "Opened Blinkt! on clock GPIO {}, data GPIO {}",
            config.clock_pin, config.data_pin
        );

        Ok(Self::new(PinPort::new(clock, data)))
    }
}

impl<P: Port> Blinkt<P> {
    /// Driver over `port` with every pixel white at full brightness.
    pub fn new(port: P) -> Self {
        Blinkt {
            store: PixelStore::initialized(),
            port,
            encoder: FrameEncoder::new(),
        }
    }

    /// Reset every pixel to white at full brightness.
    pub fn setup(&mut self) {
        self.store.initialize();
    }

    pub fn set_pixel<C: Channel>(
        &mut self,
        index: usize,
        r: C,
        g: C,
        b: C,
        brightness: Option<f64>,
    ) -> Result<()> {
        self.store.set_pixel(index, r, g, b, brightness)
    }

    pub fn set_all_pixels<C: Channel>(&mut self, r: C, g: C, b: C, brightness: Option<f64>) {
        self.store.set_all_pixels(r, g, b, brightness);
    }

    pub fn set_brightness(&mut self, index: usize, fraction: f64) -> Result<()> {
        self.store.set_brightness(index, fraction)
    }

    /// Colors back to white; brightness is left alone.
    pub fn clear_all(&mut self) {
        self.store.clear_all();
    }

    /// Push the current pixel state out to the strip.
    pub fn show(&mut self) -> Result<()> {
        self.encoder.transmit(&self.store, &mut self.port)
    }

    pub fn pixels(&self) -> &PixelStore {
        &self.store
    }

    pub fn port(&self) -> &P {
        &self.port
    }

    pub fn into_port(self) -> P {
        self.port
    }
}
