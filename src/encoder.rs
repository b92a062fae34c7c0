use embedded_hal::digital::PinState;
use log::{debug, log_enabled, trace, Level};

use crate::error::Result;
use crate::pixel::NUM_PIXELS;
use crate::port::Port;
use crate::protocol::build_frame;
use crate::store::PixelStore;

/// Serializes a `PixelStore` and clocks it out through a `Port`.
///
/// Stateless: nothing is kept between transmits. Callers sharing a port across
/// threads must serialize `transmit` themselves, an interleaved bit stream
/// corrupts the frame on the bus.
#[derive(Debug, Clone, Copy, Default)]
pub struct FrameEncoder;

impl FrameEncoder {
    pub fn new() -> Self {
        FrameEncoder
    }

    /// Send the whole strip: start frame, one frame per pixel, end frame.
    ///
    /// Nothing is written if any slot is unset. A port error aborts the frame
    /// midway and is returned as is; the protocol cannot resume.
    pub fn transmit<P: Port + ?Sized>(&self, store: &PixelStore, port: &mut P) -> Result<()> {
        let frame = build_frame(store)?;

        debug!(
            "Sending frame: {} bytes ({} pixels)",
            frame.len(),
            store.len()
        );
        if log_enabled!(Level::Trace) {
            let hex: String = frame
                .iter()
                .map(|b| format!("{:02x}", b))
                .collect::<Vec<_>>()
                .join(" ");
            trace!("Complete frame: {}", hex);
        }

        for &byte in &frame {
            self.write_byte(byte, port)?;
        }

        Ok(())
    }

    /// Clock out the top `NUM_PIXELS` bits of `byte`, most significant first.
    ///
    /// The pulse count follows the pixel count, not a fixed 8; the strip has
    /// 8 pixels so every bit goes out.
    pub fn write_byte<P: Port + ?Sized>(&self, byte: u8, port: &mut P) -> Result<()> {
        for i in 0..NUM_PIXELS {
            let bit = byte & (1 << (7 - i)) != 0;

            port.set_data(PinState::from(bit))?;
            port.set_clock(PinState::High)?;
            port.set_clock(PinState::Low)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::BlinktError;
    use crate::port::{Line, RecordingPort};
    use std::io;

    /// Fails after a fixed number of line changes.
    struct FlakyPort {
        remaining: usize,
    }

    impl Port for FlakyPort {
        fn set_clock(&mut self, _state: PinState) -> io::Result<()> {
            self.tick()
        }

        fn set_data(&mut self, _state: PinState) -> io::Result<()> {
            self.tick()
        }
    }

    impl FlakyPort {
        fn tick(&mut self) -> io::Result<()> {
            if self.remaining == 0 {
                return Err(io::Error::new(io::ErrorKind::NotFound, "pin gone"));
            }
            self.remaining -= 1;
            Ok(())
        }
    }

    #[test]
    fn test_write_byte_pulses() {
        let mut port = RecordingPort::new();
        FrameEncoder::new().write_byte(0b1000_0001, &mut port).unwrap();

        let events = port.events();
        assert_eq!(events.len(), NUM_PIXELS * 3);
        assert_eq!(events[0], (Line::Data, PinState::High));
        assert_eq!(events[1], (Line::Clock, PinState::High));
        assert_eq!(events[2], (Line::Clock, PinState::Low));
        assert_eq!(events[3], (Line::Data, PinState::Low));
        assert_eq!(events[21], (Line::Data, PinState::High));
        assert_eq!(port.decoded_bytes(), vec![0b1000_0001]);
    }

    #[test]
    fn test_transmit_default_store() {
        let mut port = RecordingPort::new();
        FrameEncoder::new()
            .transmit(&PixelStore::initialized(), &mut port)
            .unwrap();

        let bytes = port.decoded_bytes();
        assert_eq!(bytes.len(), 37);
        assert_eq!(port.sampled_bits().len(), 37 * 8);

        let mut expected = vec![0u8; 4];
        for _ in 0..NUM_PIXELS {
            expected.extend_from_slice(&[0b1110_0000 | 31, 255, 255, 255]);
        }
        expected.push(0xFF);
        assert_eq!(bytes, expected);
    }

    #[test]
    fn test_transmit_pixel_three() {
        let mut store = PixelStore::initialized();
        store.set_pixel(3, 10, 20, 30, Some(0.5)).unwrap();

        let mut port = RecordingPort::new();
        FrameEncoder::new().transmit(&store, &mut port).unwrap();

        let bytes = port.decoded_bytes();
        assert_eq!(&bytes[16..20], &[0b1110_0000 | 15, 30, 20, 10]);
    }

    #[test]
    fn test_transmit_uninitialized_writes_nothing() {
        let mut port = RecordingPort::new();
        let err = FrameEncoder::new()
            .transmit(&PixelStore::new(), &mut port)
            .unwrap_err();
        assert!(matches!(err, BlinktError::PixelNotInitialized { .. }));
        assert!(port.events().is_empty());
    }

    #[test]
    fn test_transmit_propagates_port_error() {
        let mut port = FlakyPort { remaining: 10 };
        let err = FrameEncoder::new()
            .transmit(&PixelStore::initialized(), &mut port)
            .unwrap_err();
        match err {
            BlinktError::Io(e) => assert_eq!(e.kind(), io::ErrorKind::NotFound),
            other => panic!("unexpected error: {}", other),
        }
    }
}
