use serde::{Deserialize, Serialize};

use crate::gpio::SYSFS_GPIO_ROOT;

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub gpio: GpioConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GpioConfig {
    /// GPIO number of the clock line
    #[serde(default = "default_clock_pin")]
    pub clock_pin: u32,
    /// GPIO number of the data line
    #[serde(default = "default_data_pin")]
    pub data_pin: u32,
    /// sysfs GPIO directory
    #[serde(default = "default_sysfs_root")]
    pub sysfs_root: String,
    /// Hand pins we exported back to the kernel when the driver is dropped
    #[serde(default = "default_unexport_on_drop")]
    pub unexport_on_drop: bool,
}

impl Default for GpioConfig {
    fn default() -> Self {
        GpioConfig {
            clock_pin: default_clock_pin(),
            data_pin: default_data_pin(),
            sysfs_root: default_sysfs_root(),
            unexport_on_drop: default_unexport_on_drop(),
        }
    }
}

fn default_clock_pin() -> u32 {
    24
}

fn default_data_pin() -> u32 {
    23
}

fn default_sysfs_root() -> String {
    SYSFS_GPIO_ROOT.to_string()
}

fn default_unexport_on_drop() -> bool {
    true
}
