//! Built-in legend.
//!
//! The legend is an ordinary fact document that shows one entity of each
//! known device/location type and one connection of each relation kind. Every
//! legend entity name carries a per-run random token so the legend never
//! collides with user entities (or with another legend).

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

const PREFIX_PLACEHOLDER: &str = "{prefix}";

const LEGEND_TEMPLATE: &str = r#"Legend:{prefix}LegendLoc has a Type of Location
Legend:{prefix}LegendLoc has a Blurb of "All items may have a Blurb, such as this. They may also have any arbitrary attribute, such as an IPAddress, OS, or any named key."

Ethernet:{prefix}LegendVMEth has a Type of Note
Ethernet:{prefix}LegendVMEth is connected to Legend:{prefix}LegendLoc via Ethernet
Ethernet:{prefix}LegendVMEth has a Blurb of "Blue lines indicate an Ethernet Connection."

WiFi:{prefix}LegendVMWifi has a Type of Note
WiFi:{prefix}LegendVMWifi is connected to Legend:{prefix}LegendLoc via WiFi
WiFi:{prefix}LegendVMWifi has a Blurb of "Green lines indicate a WiFi Connection."

Physical:{prefix}LegendVMPhys has a Type of Note
Physical:{prefix}LegendVMPhys is connected to Legend:{prefix}LegendLoc via Physical
Physical:{prefix}LegendVMPhys has a Blurb of "Black lines indicate a Physical Connection."

Unknown:{prefix}LegendVMUnknown has a Type of Note
Unknown:{prefix}LegendVMUnknown is connected to Legend:{prefix}LegendLoc via unknown
Unknown:{prefix}LegendVMUnknown has a Blurb of "Grey lines specify an unknown connection type."

Router:{prefix}LegendRouter has a Type of Router
Router:{prefix}LegendRouter has a IPAddress of 192.168.0.1
Router:{prefix}LegendRouter is connected to Legend:{prefix}LegendLoc via Physical

Switch:{prefix}LegendSwitch has a Type of Switch
Switch:{prefix}LegendSwitch is connected to Legend:{prefix}LegendLoc via Ethernet

Phone:{prefix}LegendPhone has a Type of Phone
Phone:{prefix}LegendPhone is connected to Legend:{prefix}LegendLoc via WiFi

PC:{prefix}LegendPC has a Type of PC
PC:{prefix}LegendPC is connected to Legend:{prefix}LegendLoc via Ethernet

Laptop:{prefix}LegendLaptop has a Type of Laptop
Laptop:{prefix}LegendLaptop is connected to Legend:{prefix}LegendLoc via WiFi
Laptop:{prefix}LegendLaptop is connected to Legend:{prefix}LegendLoc via Ethernet

VM:{prefix}LegendVM has a Type of VirtualMachine
VM:{prefix}LegendVM is connected to Legend:{prefix}LegendLoc

Unknown:{prefix}LegendUnknown has a Blurb of "no type given"
Unknown:{prefix}LegendUnknown is connected to Legend:{prefix}LegendLoc

Shape:{prefix}Legend2 has a Type of Note
Shape:{prefix}Legend2 has a Shape of "triangle"
Shape:{prefix}Legend2 has a Blurb of "Custom shapes are provided by the Shape attribute.\nAnything that DOT/graphviz would understand is accepted."
Shape:{prefix}Legend2 is connected to Legend:{prefix}LegendLoc via Physical
"#;

/// Namespace token spliced into every legend entity name.
///
/// 32 lowercase hex digits (16 bytes). Draw one per conversion run with
/// [`LegendPrefix::random`] and reuse it for the whole legend so the legend's
/// internal relations resolve to the same entities.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LegendPrefix(String);

impl LegendPrefix {
    /// Fresh prefix from the OS random source (UUIDv4 entropy, hex encoded).
    pub fn random() -> Self {
        Self(Uuid::new_v4().simple().to_string())
    }

    /// Fixed prefix, for reproducible output.
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for LegendPrefix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The legend document with `prefix` substituted into every entity name.
pub fn legend_text(prefix: &LegendPrefix) -> String {
    LEGEND_TEMPLATE.replace(PREFIX_PLACEHOLDER, prefix.as_str())
}
