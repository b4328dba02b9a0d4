//! Heuristic sample decoding.
//!
//! Records are assumed to be a 2-byte marker followed by a little-endian
//! `u16`. Neither the marker set nor the scaling has been confirmed against
//! the device, so both are parameters and every result is a candidate.

use std::fmt;

use serde::{Serialize, Serializer};

/// Marker plus value.
pub const RECORD_LEN: usize = 4;

/// Markers seen ahead of what look like depth readings.
pub const DEFAULT_MARKERS: [Marker; 3] = [
    Marker([0xC2, 0x00]),
    Marker([0xC3, 0x00]),
    Marker([0xC4, 0x00]),
];

/// A 2-byte record prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Marker(pub [u8; 2]);

impl Marker {
    /// Parse a marker from four hex digits, e.g. `"c200"`.
    pub fn from_hex(text: &str) -> Option<Self> {
        let mut bytes = [0u8; 2];
        hex::decode_to_slice(text.trim(), &mut bytes).ok()?;
        Some(Self(bytes))
    }

    /// Lowercase hex, e.g. `"c200"`.
    pub fn to_hex(self) -> String {
        hex::encode(self.0)
    }
}

impl fmt::Display for Marker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl Serialize for Marker {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

/// Converts a raw record value into a physical reading.
pub trait ValueScale {
    fn scale(&self, marker: Marker, raw: u16) -> f64;

    /// Unit label for scaled values.
    fn unit(&self) -> &str;
}

/// Divides every raw value by a constant.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Divisor {
    pub divisor: f64,
    pub unit: &'static str,
}

impl Divisor {
    pub fn new(divisor: f64) -> Self {
        Self {
            divisor,
            unit: "m?",
        }
    }
}

impl Default for Divisor {
    /// Centimetres to metres. Unverified.
    fn default() -> Self {
        Self::new(100.0)
    }
}

impl ValueScale for Divisor {
    fn scale(&self, _marker: Marker, raw: u16) -> f64 {
        f64::from(raw) / self.divisor
    }

    fn unit(&self) -> &str {
        self.unit
    }
}

/// One candidate reading inside a block.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Sample {
    /// Byte offset of the marker within the block.
    pub offset: usize,
    pub marker: Marker,
    /// Little-endian value following the marker.
    pub raw: u16,
    pub scaled: f64,
}

/// Scans block bytes for marker-prefixed records.
pub struct SampleExtractor<S = Divisor> {
    markers: Vec<Marker>,
    scale: S,
}

impl SampleExtractor<Divisor> {
    /// Default markers, values divided by 100.
    pub fn new() -> Self {
        Self::with_scale(DEFAULT_MARKERS.to_vec(), Divisor::default())
    }
}

impl Default for SampleExtractor<Divisor> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: ValueScale> SampleExtractor<S> {
    pub fn with_scale(markers: Vec<Marker>, scale: S) -> Self {
        Self { markers, scale }
    }

    pub fn markers(&self) -> &[Marker] {
        &self.markers
    }

    pub fn scale(&self) -> &S {
        &self.scale
    }

    /// Extract samples in offset order.
    ///
    /// The scan moves one byte at a time until a marker matches, then skips
    /// the whole record. Scanning stops once fewer than five bytes remain,
    /// so a record ending exactly at the end of the block is not read.
    pub fn extract(&self, data: &[u8]) -> Vec<Sample> {
        let mut samples = Vec::new();
        let mut i = 0usize;

        while i + RECORD_LEN < data.len() {
            let candidate = Marker([data[i], data[i + 1]]);
            if !self.markers.contains(&candidate) {
                i += 1;
                continue;
            }

            let raw = u16::from_le_bytes([data[i + 2], data[i + 3]]);
            samples.push(Sample {
                offset: i,
                marker: candidate,
                raw,
                scaled: self.scale.scale(candidate, raw),
            });
            i += RECORD_LEN;
        }

        tracing::debug!(input = data.len(), samples = samples.len(), "extracted samples");
        samples
    }
}
