//! Test plans
//!
//! The commands a run exercises and the commands it deliberately skips.
//! Plans are either the built-in default or loaded from JSON:
//!
//! ```json
//! {
//!   "commands": [
//!     { "command": "ECHO", "args": "somedata", "regex": "somedata" },
//!     { "command": "DEVICE.AUTOEXPOSURE", "timeout": 30 }
//!   ],
//!   "whitelist": ["HALT", "REBOOT"]
//! }
//! ```

use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::driver::CommandSpec;
use crate::error::{DmccError, Result};

/// Commands to run plus commands excluded from coverage checking
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestPlan {
    pub commands: Vec<CommandSpec>,

    #[serde(default)]
    pub whitelist: Vec<String>,
}

impl Default for TestPlan {
    fn default() -> Self {
        Self {
            commands: default_commands(),
            whitelist: default_whitelist(),
        }
    }
}

impl TestPlan {
    /// Parse a plan from JSON text
    pub fn from_json(text: &str) -> Result<Self> {
        let plan: TestPlan = serde_json::from_str(text)?;
        plan.validate()?;
        Ok(plan)
    }

    /// Load a plan from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|e| {
            DmccError::Catalogue(format!("cannot read {}: {}", path.display(), e))
        })?;
        Self::from_json(&text)
    }

    fn validate(&self) -> Result<()> {
        if let Some(blank) = self.commands.iter().position(|c| c.command.trim().is_empty()) {
            return Err(DmccError::Catalogue(format!(
                "command #{} has an empty name",
                blank
            )));
        }
        Ok(())
    }
}

/// Commands exercised on a DM-series device
pub fn default_commands() -> Vec<CommandSpec> {
    vec![
        CommandSpec::new("AIMER").args("1 1"),
        CommandSpec::new("AIMER").args("2 1"),
        CommandSpec::new("AIMER").args("1 0"),
        CommandSpec::new("AIMER").args("2 0"),
        CommandSpec::new("DEVICE.AUTOEXPOSURE").timeout(Duration::from_secs(30)),
        CommandSpec::new("DIAGS.VERSION").regex(r"v1\."),
        CommandSpec::new("DOCS").regex("== Diags 2 =="),
        CommandSpec::new("ECHO").args("somedata").regex("somedata"),
        CommandSpec::new("ECHO_DATA").args("9\nsome\ndata").regex("some\ndata"),
        CommandSpec::new("GPIO.LIST").regex("Linename"),
        CommandSpec::new("GPIO.READ").args("BTN_TRIG").regex("1"),
        // Unconnected on a DM280, safe to toggle
        CommandSpec::new("GPIO.WRITE").args("SD2_DATA0 1"),
        CommandSpec::new("GPIO.WRITE").args("SD2_DATA0 0"),
        CommandSpec::new("HELP").regex("Diags 2"),
        CommandSpec::new("HELP").args("HELP").regex("Add command names"),
        CommandSpec::new("IMAGE.ACQUIRE"),
        CommandSpec::new("IMAGE.FOCUS"),
        CommandSpec::new("IMAGE.RESET"),
        // Transfers fail after a reset until the next acquire
        CommandSpec::new("IMAGE.ACQUIRE"),
        CommandSpec::new("IMAGE.SAVE_BMP").regex(r".*bmp\n"),
        CommandSpec::new("IMAGE.TFER_8BIT").regex(r"\d+\n"),
        CommandSpec::new("IMAGE.TFER_BMP").regex(r"\d+\n"),
        CommandSpec::new("IMAGE.TFER_RAW").regex(r"\d+\n"),
        CommandSpec::new("M4.LIST_REG").regex(r"\[.*\]"),
        CommandSpec::new("M4.READ").args("sw_version").regex("0x"),
        CommandSpec::new("M4.WRITE").args("virtual_input0 1"),
        CommandSpec::new("SLEEP").args("500"),
        CommandSpec::new("SYSTEMDUMP").regex(r"\d+\n"),
        CommandSpec::new("TRUE"),
        CommandSpec::new("UBOOT.VERSION").regex("U-Boot"),
        CommandSpec::new("GET BUTTONS").args("IO_BOARD_TRIGGER"),
        CommandSpec::new("SET BUZZER.FREQ").args("3000"),
        CommandSpec::new("GET BUZZER.FREQ").regex("3000"),
        CommandSpec::new("SET BUZZER.FREQ").args("0"),
        CommandSpec::new("GET BUZZER.FREQ").regex("0"),
    ]
}

/// Commands that cannot be exercised safely or at all on the bench
pub fn default_whitelist() -> Vec<String> {
    [
        // autoload needs a recording session
        "AUTOLOAD.RECORD.START",
        "AUTOLOAD.RECORD.STOP",
        "GET AUTOLOAD.DELAY",
        "GET AUTOLOAD.ENABLE",
        "GET AUTOLOAD.LOOP",
        // tested separately
        "FIRMWARE.UPDATE",
        // would take the device down
        "HALT",
        "REBOOT",
        "POWEROFF",
        "HWDATA.FORMAT_PARTITION",
        // no loopback fixture
        "LOOPBACK_TEST",
        // no raft attached
        "RAFT.DELETE",
        "RAFT.DOWNLOAD",
        "RAFT.HOME",
        "RAFT.LIST",
        "RAFT.RESET",
        "RAFT.RESET_HOME",
        "RAFT.ROTATE",
        "RAFT.ROTATE_TO",
        "RAFT.RUN",
        "RAFT.SETTINGS_UPLOAD",
        // Kite only
        "USB.ENABLE",
        "WIFI.SCAN",
        "GET BATTERY",
        "OLED.ADD_TEXT",
        "OLED.FILL_RGB",
        "OLED.OPEN_IMAGE",
        "OLED.SEND_IMAGE",
        "OLED.SEND_RAW_IMAGE",
        "BLUETOOTH.SCAN",
        "GET BLUETOOTH.DISCOVERABLE",
        "GET BLUETOOTH.SCAN-RESULTS",
        "GET ACCELEROMETER.DATA",
        "GET CRADLE_DETECT",
        "GET CURRENT-LIMIT",
    ]
    .into_iter()
    .map(String::from)
    .collect()
}
