//! Serialized payload sizing.
//!
//! Embedded `data:` images are what usually pushes a catalog past the
//! store's upload limit, so the report ranks records by serialized size and
//! calls out how much of each is image data.

use core::fmt;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde::Serialize;
use showcase_core::AppData;

const BYTES_PER_KB: f64 = 1024.0;

/// Size of a serialized JSON body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct PayloadSize {
    bytes: usize,
}

impl PayloadSize {
    #[must_use]
    pub const fn from_bytes(bytes: usize) -> Self {
        Self { bytes }
    }

    /// Size of an already serialized body.
    #[must_use]
    pub const fn of_body(body: &str) -> Self {
        Self::from_bytes(body.len())
    }

    /// Size of `value` once serialized to compact JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if `value` cannot be serialized.
    pub fn of<T: Serialize>(value: &T) -> Result<Self, serde_json::Error> {
        serde_json::to_vec(value).map(|body| Self::from_bytes(body.len()))
    }

    #[must_use]
    pub const fn bytes(self) -> usize {
        self.bytes
    }

    #[must_use]
    #[allow(clippy::cast_precision_loss)] // payloads are far below 2^52 bytes
    pub fn kilobytes(self) -> f64 {
        self.bytes as f64 / BYTES_PER_KB
    }

    /// Strictly larger than `threshold_kb`.
    #[must_use]
    pub fn exceeds_kb(self, threshold_kb: f64) -> bool {
        self.kilobytes() > threshold_kb
    }
}

impl fmt::Display for PayloadSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2} KB", self.kilobytes())
    }
}

/// Which collection a record belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordKind {
    Product,
    CaseStudy,
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Product => f.write_str("product"),
            Self::CaseStudy => f.write_str("case study"),
        }
    }
}

/// One record's contribution to the payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordWeight {
    pub kind: RecordKind,
    pub id: String,
    /// Product name or case study title.
    pub label: String,
    pub size: PayloadSize,
    /// Decoded size of an embedded image, if the record carries one.
    pub embedded_image_bytes: Option<usize>,
}

/// Total payload size plus the heaviest records.
#[derive(Debug, Clone)]
pub struct PayloadReport {
    pub size: PayloadSize,
    pub heaviest: Vec<RecordWeight>,
}

impl PayloadReport {
    /// Measure `data` and keep the `limit` heaviest records, largest first.
    ///
    /// # Errors
    ///
    /// Returns an error if any part of `data` cannot be serialized.
    pub fn build(data: &AppData, limit: usize) -> Result<Self, serde_json::Error> {
        let size = PayloadSize::of(data)?;

        let mut weights = Vec::with_capacity(data.products.len() + data.cases.len());
        for product in &data.products {
            weights.push(RecordWeight {
                kind: RecordKind::Product,
                id: product.id.to_string(),
                label: product.name.clone(),
                size: PayloadSize::of(product)?,
                embedded_image_bytes: embedded_image_size(&product.image_url),
            });
        }
        for case in &data.cases {
            weights.push(RecordWeight {
                kind: RecordKind::CaseStudy,
                id: case.id.to_string(),
                label: case.title.clone(),
                size: PayloadSize::of(case)?,
                embedded_image_bytes: embedded_image_size(&case.image_url),
            });
        }

        weights.sort_by(|a, b| b.size.cmp(&a.size));
        weights.truncate(limit);

        Ok(Self {
            size,
            heaviest: weights,
        })
    }

    /// Records that embed image data, among the heaviest.
    pub fn embedded_images(&self) -> impl Iterator<Item = &RecordWeight> {
        self.heaviest
            .iter()
            .filter(|w| w.embedded_image_bytes.is_some())
    }
}

/// Decoded byte size of a `data:<mime>;base64,<payload>` URL.
///
/// Returns `None` for ordinary URLs and for data URLs whose payload does not
/// decode.
#[must_use]
pub fn embedded_image_size(url: &str) -> Option<usize> {
    let rest = url.strip_prefix("data:")?;
    let (_, payload) = rest.split_once(";base64,")?;
    STANDARD.decode(payload.trim()).ok().map(|bytes| bytes.len())
}
