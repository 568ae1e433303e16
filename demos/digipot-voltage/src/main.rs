//! Digital potentiometer voltage sweep
//!
//! Demonstrates basic usage of the ad5144-driver crate on the Raspberry Pi
//! Pico 2. Steps wiper 0 through a handful of target voltages, reads all
//! four wipers back after each step, and logs the codes and modelled
//! output voltages via defmt.
//!
//! # Wiring
//!
//! | Signal    | Pico 2 Pin | Notes                        |
//! |-----------|------------|------------------------------|
//! | I2C0 SDA  | GP20       | External pull-up             |
//! | I2C0 SCL  | GP21       | External pull-up             |

#![no_std]
#![no_main]

use defmt::*;
use embassy_executor::Spawner;
use embassy_rp as hal;
use embassy_rp::block::ImageDef;
use embassy_rp::i2c::{self, I2c};
use embassy_time::{Duration, Timer};
use {defmt_rtt as _, panic_probe as _};

use ad5144_driver::{Ad5144, Channel, DEFAULT_ADDRESS};

/// Tell the Boot ROM about our application.
#[link_section = ".start_block"]
#[used]
pub static IMAGE_DEF: ImageDef = hal::block::ImageDef::secure_exe();

/// Wiper 0 targets, in volts. Reference is 0.4 V.
const TARGETS: [f32; 5] = [0.05, 0.1, 0.2, 0.3, 0.4];

#[embassy_executor::main]
async fn main(_spawner: Spawner) {
    let p = embassy_rp::init(Default::default());

    // --- I2C bus (GP20 = SDA, GP21 = SCL) ---
    let i2c = I2c::new_blocking(
        p.I2C0,
        p.PIN_21, // SCL
        p.PIN_20, // SDA
        i2c::Config::default(),
    );

    // --- Potentiometer ---
    let mut pot = Ad5144::new(i2c, DEFAULT_ADDRESS);

    if let Err(e) = pot.reset() {
        error!("Reset failed: {}", e);
    }

    match pot.refresh_control() {
        Ok(control) => info!("Control register: {}", control),
        Err(e) => error!("Control read failed: {}", e),
    }

    info!("Voltage sweep started");

    loop {
        for &target in TARGETS.iter() {
            match pot.set_output_voltage(Channel::Ch0, target) {
                Ok(code) => info!("Target {} V -> code {}", target, code),
                Err(e) => {
                    error!("Setting {} V failed: {}", target, e);
                    continue;
                }
            }

            match pot.refresh_rdac() {
                Ok(codes) => info!(
                    "Wipers: [{}, {}, {}, {}]",
                    codes[0], codes[1], codes[2], codes[3],
                ),
                Err(e) => error!("Read failed: {}", e),
            }

            if let Ok(Some(volts)) = pot.cached_output_voltage(Channel::Ch0) {
                info!("Modelled output: {} V", volts);
            }

            Timer::after(Duration::from_millis(1000)).await;
        }
    }
}
