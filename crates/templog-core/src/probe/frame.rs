//! Frame decoding
//!
//! Interprets the raw 32-bit frame returned by the converter.
//!
//! Frame layout (MSB first, bit 31 = sign of the external field):
//! - Bits \[31:18\]: external-junction temperature, 14-bit two's complement,
//!   0.25 °C per LSB
//! - Bit 16: overall fault flag
//! - Bits \[15:4\]: internal (cold-junction) temperature, 12-bit two's
//!   complement, 0.0625 °C per LSB
//! - Bits \[2:0\]: fault detail (bit 0 open circuit, bit 1 short to ground,
//!   bit 2 short to supply)

use std::fmt;

use serde::Serialize;

/// One raw 32-bit frame captured MSB-first from the link.
///
/// A frame has no inherent validity beyond its bit length; a disconnected or
/// miswired link yields all-zero or stuck-bit frames.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawFrame(
    /// The 32 frame bits, as shifted in
    pub u32,
);

impl RawFrame {
    /// Decode this frame into a temperature/fault sample.
    pub fn decode(self) -> DecodedSample {
        decode(self)
    }

    /// Heuristic for a stuck or floating data line.
    pub(crate) fn looks_stuck(self) -> bool {
        self.0 == 0 || self.0 == u32::MAX
    }
}

impl fmt::Display for RawFrame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#010x}", self.0)
    }
}

// External field: 14 bits at [31:18]
pub(crate) const EXT_SHIFT: u32 = 18;
pub(crate) const EXT_MASK: u32 = 0x3FFF;
const EXT_SIGN_BIT: u32 = 0x2000;
const EXT_SIGN_EXTEND: u32 = 0xFFFF_C000;
pub(crate) const EXT_LSB_C: f64 = 0.25;

// Internal field: 12 bits at [15:4]
pub(crate) const INT_SHIFT: u32 = 4;
pub(crate) const INT_MASK: u32 = 0x0FFF;
const INT_SIGN_BIT: u32 = 0x0800;
const INT_SIGN_EXTEND: u32 = 0xFFFF_F000;
pub(crate) const INT_LSB_C: f64 = 0.0625;

// Fault bits
pub(crate) const FAULT_FLAG: u32 = 0x0001_0000;
pub(crate) const FAULT_OC: u32 = 0x0000_0001;
pub(crate) const FAULT_SCG: u32 = 0x0000_0002;
pub(crate) const FAULT_SCV: u32 = 0x0000_0004;

/// Decode a raw frame into a temperature/fault sample. Pure, no side
/// effects.
///
/// Sign extension is done by ORing in the high-bit mask when the field's top
/// bit is set, never by a narrowing cast.
pub fn decode(frame: RawFrame) -> DecodedSample {
    let bits = frame.0;

    let mut ext = (bits >> EXT_SHIFT) & EXT_MASK;
    if ext & EXT_SIGN_BIT != 0 {
        ext |= EXT_SIGN_EXTEND;
    }
    let external_temp_c = (ext as i32) as f64 * EXT_LSB_C;

    let mut int = (bits >> INT_SHIFT) & INT_MASK;
    if int & INT_SIGN_BIT != 0 {
        int |= INT_SIGN_EXTEND;
    }
    let internal_temp_c = (int as i32) as f64 * INT_LSB_C;

    let fault = FaultStatus {
        flag: bits & FAULT_FLAG != 0,
        open_circuit: bits & FAULT_OC != 0,
        short_to_gnd: bits & FAULT_SCG != 0,
        short_to_vcc: bits & FAULT_SCV != 0,
    };

    DecodedSample {
        external_temp_c,
        internal_temp_c,
        fault,
    }
}

/// A decoded temperature sample. Immutable once produced.
///
/// When the fault flag is set the external field is undefined per the
/// datasheet, but it is still decoded and returned as-is; callers must
/// inspect [`DecodedSample::fault`] before trusting `external_temp_c`. This
/// pass-through is intentional; downstream consumers rely on seeing a value
/// alongside the flag.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DecodedSample {
    /// External-junction (probe) temperature in °C
    pub external_temp_c: f64,
    /// Internal (cold-junction/reference) temperature in °C
    pub internal_temp_c: f64,
    /// Fault flag and detail bits
    pub fault: FaultStatus,
}

/// Fault flag and detail bits of a decoded frame.
///
/// Faults are data, not errors: every set bit is reported, and more than one
/// detail bit can be set at once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FaultStatus {
    /// Overall fault flag (bit 16)
    pub flag: bool,
    /// Thermocouple open circuit (detail bit 0)
    pub open_circuit: bool,
    /// Thermocouple shorted to ground (detail bit 1)
    pub short_to_gnd: bool,
    /// Thermocouple shorted to supply (detail bit 2)
    pub short_to_vcc: bool,
}

impl FaultStatus {
    /// Whether the overall fault flag is set.
    pub fn any(&self) -> bool {
        self.flag
    }

    /// Classify the detail bits into the closed fault set.
    ///
    /// More than one set bit yields [`FaultKind::Multiple`]; use the
    /// individual fields (or [`fmt::Display`]) when every set bit matters.
    pub fn kind(&self) -> FaultKind {
        match (self.open_circuit, self.short_to_gnd, self.short_to_vcc) {
            (false, false, false) => FaultKind::None,
            (true, false, false) => FaultKind::OpenCircuit,
            (false, true, false) => FaultKind::ShortToGnd,
            (false, false, true) => FaultKind::ShortToVcc,
            _ => FaultKind::Multiple,
        }
    }
}

impl fmt::Display for FaultStatus {
    /// Prints every set detail bit, e.g. `SCV SCG OC`, or `none`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.flag {
            return f.write_str("none");
        }
        let mut wrote = false;
        for (set, label) in [
            (self.short_to_vcc, "SCV"),
            (self.short_to_gnd, "SCG"),
            (self.open_circuit, "OC"),
        ] {
            if set {
                if wrote {
                    f.write_str(" ")?;
                }
                f.write_str(label)?;
                wrote = true;
            }
        }
        if !wrote {
            // Flag set with no detail bit: still a fault
            f.write_str("fault")?;
        }
        Ok(())
    }
}

/// Closed classification of the fault detail bits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum FaultKind {
    /// No detail bit set
    None,
    /// Thermocouple open circuit
    OpenCircuit,
    /// Thermocouple shorted to ground
    ShortToGnd,
    /// Thermocouple shorted to supply
    ShortToVcc,
    /// More than one detail bit set
    Multiple,
}
