//! Linux sysfs GPIO backend.
//!
//! Each pin is driven by writing `0` or `1` to `<root>/gpio<N>/value`. Pins
//! that are not yet visible are exported through `<root>/export` and handed
//! back through `<root>/unexport` on drop.

use std::fmt;
use std::fs::{self, File, OpenOptions};
use std::io::{self, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};
use std::thread;
use std::time::Duration;

use embedded_hal::digital::{ErrorKind, ErrorType, OutputPin};
use log::{debug, warn};

/// Default sysfs GPIO directory.
pub const SYSFS_GPIO_ROOT: &str = "/sys/class/gpio";

/// udev needs a moment to fix permissions on a freshly exported pin.
const EXPORT_SETTLE: Duration = Duration::from_millis(100);
const EXPORT_RETRIES: usize = 10;

/// I/O failure on a sysfs pin.
#[derive(Debug)]
pub struct SysfsError(pub io::Error);

impl fmt::Display for SysfsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "sysfs GPIO error: {}", self.0)
    }
}

impl std::error::Error for SysfsError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.0)
    }
}

impl embedded_hal::digital::Error for SysfsError {
    fn kind(&self) -> ErrorKind {
        ErrorKind::Other
    }
}

/// Output pin exported through sysfs.
#[derive(Debug)]
pub struct SysfsPin {
    number: u32,
    root: PathBuf,
    value: File,
    exported: bool,
    unexport_on_drop: bool,
}

impl SysfsPin {
    /// Export (if needed) and configure pin `number` as a low output.
    pub fn open(root: impl AsRef<Path>, number: u32, unexport_on_drop: bool) -> io::Result<Self> {
        let root = root.as_ref().to_path_buf();
        let pin_dir = root.join(format!("gpio{}", number));

        let exported = if pin_dir.exists() {
            false
        } else {
            debug!("Exporting GPIO {} via {}", number, root.display());
            fs::write(root.join("export"), number.to_string())?;
            true
        };

        let configured = write_with_retry(&pin_dir.join("direction"), b"low")
            .and_then(|()| OpenOptions::new().write(true).open(pin_dir.join("value")));

        let value = match configured {
            Ok(value) => value,
            Err(e) => {
                // A pin we exported but could not configure is handed back
                if exported {
                    unexport(&root, number);
                }
                return Err(e);
            }
        };

        debug!("GPIO {} ready as output", number);

        Ok(SysfsPin {
            number,
            root,
            value,
            exported,
            unexport_on_drop,
        })
    }

    pub fn number(&self) -> u32 {
        self.number
    }

    fn write_value(&mut self, high: bool) -> io::Result<()> {
        self.value.seek(SeekFrom::Start(0))?;
        self.value.write_all(if high { b"1" } else { b"0" })
    }
}

// "low" sets direction out and drives the line low in one step. The direction
// file can briefly be unwritable right after export.
fn write_with_retry(path: &Path, contents: &[u8]) -> io::Result<()> {
    let mut attempt = 0;
    loop {
        match fs::write(path, contents) {
            Ok(()) => return Ok(()),
            Err(e)
                if attempt < EXPORT_RETRIES
                    && matches!(
                        e.kind(),
                        io::ErrorKind::PermissionDenied | io::ErrorKind::NotFound
                    ) =>
            {
                attempt += 1;
                thread::sleep(EXPORT_SETTLE);
            }
            Err(e) => return Err(e),
        }
    }
}

impl ErrorType for SysfsPin {
    type Error = SysfsError;
}

impl OutputPin for SysfsPin {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.write_value(false).map_err(SysfsError)
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.write_value(true).map_err(SysfsError)
    }
}

impl Drop for SysfsPin {
    fn drop(&mut self) {
        if self.exported && self.unexport_on_drop {
            unexport(&self.root, self.number);
        }
    }
}

fn unexport(root: &Path, number: u32) {
    if let Err(e) = fs::write(root.join("unexport"), number.to_string()) {
        warn!("Failed to unexport GPIO {}: {}", number, e);
    } else {
        debug!("Unexported GPIO {}", number);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    static NEXT_DIR: AtomicUsize = AtomicUsize::new(0);

    /// Fake sysfs tree with pin directories already present.
    fn fake_root(pins: &[u32]) -> PathBuf {
        let root = std::env::temp_dir().join(format!(
            "blinkt-gpio-test-{}-{}",
            std::process::id(),
            NEXT_DIR.fetch_add(1, Ordering::Relaxed)
        ));
        let _ = fs::remove_dir_all(&root);
        for pin in pins {
            let dir = root.join(format!("gpio{}", pin));
            fs::create_dir_all(&dir).unwrap();
            fs::write(dir.join("direction"), "in").unwrap();
            fs::write(dir.join("value"), "0").unwrap();
        }
        root
    }

    #[test]
    fn test_open_existing_pin() {
        let root = fake_root(&[24]);
        let mut pin = SysfsPin::open(&root, 24, true).unwrap();
        assert_eq!(pin.number(), 24);
        assert_eq!(fs::read_to_string(root.join("gpio24/direction")).unwrap(), "low");

        pin.set_high().unwrap();
        assert_eq!(fs::read_to_string(root.join("gpio24/value")).unwrap(), "1");
        pin.set_low().unwrap();
        assert_eq!(fs::read_to_string(root.join("gpio24/value")).unwrap(), "0");

        // not exported by us, so nothing is unexported
        drop(pin);
        assert!(!root.join("unexport").exists());
        fs::remove_dir_all(&root).unwrap();
    }

    #[test]
    fn test_failed_configure_unexports_pin() {
        // export is accepted but gpio23/ never shows up
        let root = fake_root(&[]);
        fs::create_dir_all(&root).unwrap();
        fs::write(root.join("export"), "").unwrap();

        let err = SysfsPin::open(&root, 23, false).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
        assert_eq!(fs::read_to_string(root.join("export")).unwrap(), "23");
        assert_eq!(fs::read_to_string(root.join("unexport")).unwrap(), "23");
        fs::remove_dir_all(&root).unwrap();
    }

    #[test]
    fn test_open_missing_root_fails() {
        let root = fake_root(&[]);
        let err = SysfsPin::open(&root, 23, true).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }
}
