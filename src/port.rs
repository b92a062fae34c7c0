//! Two-line digital output used to bit-bang the strip.
//!
//! `Port` is the only thing the encoder needs from the hardware. Each call must
//! have taken effect on the line before it returns.

use std::io;

use embedded_hal::digital::{OutputPin, PinState};

use crate::pixel::NUM_PIXELS;

/// Clock and data output lines.
pub trait Port {
    fn set_clock(&mut self, state: PinState) -> io::Result<()>;
    fn set_data(&mut self, state: PinState) -> io::Result<()>;
}

/// Port built from any two `embedded-hal` output pins.
pub struct PinPort<C, D> {
    clock: C,
    data: D,
}

impl<C, D> PinPort<C, D>
where
    C: OutputPin,
    D: OutputPin,
{
    pub fn new(clock: C, data: D) -> Self {
        PinPort { clock, data }
    }

    /// Give the pins back
    pub fn release(self) -> (C, D) {
        (self.clock, self.data)
    }
}

impl<C, D> Port for PinPort<C, D>
where
    C: OutputPin,
    D: OutputPin,
{
    fn set_clock(&mut self, state: PinState) -> io::Result<()> {
        self.clock.set_state(state).map_err(pin_error)
    }

    fn set_data(&mut self, state: PinState) -> io::Result<()> {
        self.data.set_state(state).map_err(pin_error)
    }
}

fn pin_error<E: embedded_hal::digital::Error>(e: E) -> io::Error {
    io::Error::other(format!("GPIO write failed: {:?}", e))
}

/// Which line an event touched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Line {
    Clock,
    Data,
}

/// Fake port that records every line change instead of driving hardware.
#[derive(Debug, Clone)]
pub struct RecordingPort {
    events: Vec<(Line, PinState)>,
}

impl Default for RecordingPort {
    fn default() -> Self {
        Self::new()
    }
}

impl RecordingPort {
    pub fn new() -> Self {
        RecordingPort { events: Vec::new() }
    }

    /// Every `set_*` call in order.
    pub fn events(&self) -> &[(Line, PinState)] {
        &self.events
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }

    /// Data-line level sampled at each clock rising edge.
    pub fn sampled_bits(&self) -> Vec<bool> {
        let mut clock = PinState::Low;
        let mut data = PinState::Low;
        let mut bits = Vec::new();

        for &(line, state) in &self.events {
            match line {
                Line::Data => data = state,
                Line::Clock => {
                    if clock == PinState::Low && state == PinState::High {
                        bits.push(data == PinState::High);
                    }
                    clock = state;
                }
            }
        }

        bits
    }

    /// Bytes seen on the bus, `NUM_PIXELS` bits per byte, most significant first.
    ///
    /// A trailing partial byte is dropped.
    pub fn decoded_bytes(&self) -> Vec<u8> {
        self.sampled_bits()
            .chunks_exact(NUM_PIXELS)
            .map(|chunk| {
                let value = chunk
                    .iter()
                    .fold(0u8, |acc, &bit| (acc << 1) | u8::from(bit));
                value << (8 - NUM_PIXELS)
            })
            .collect()
    }
}

impl Port for RecordingPort {
    fn set_clock(&mut self, state: PinState) -> io::Result<()> {
        self.events.push((Line::Clock, state));
        Ok(())
    }

    fn set_data(&mut self, state: PinState) -> io::Result<()> {
        self.events.push((Line::Data, state));
        Ok(())
    }
}
