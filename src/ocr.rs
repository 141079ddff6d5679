//! Tesseract observation source
//!
//! Adapts the external Tesseract engine's word-level TSV output into
//! normalized [`Observation`]s. Recognition itself stays a black box:
//! this module only locates the binary, runs it, and converts bounding
//! boxes from pixel top-left coordinates to the normalized lower-left
//! Y-up convention the Coordinate Mapper expects.

use crate::grid::{GridError, ImageGeometry, NormPoint, Observation, ObservationSet};
use image::GenericImageView;
use std::path::{Path, PathBuf};
use std::process::Command;
use thiserror::Error;

/// Digits the engine is allowed to report; everything else is noise
const DIGIT_WHITELIST: &str = "123456789";

/// Default page segmentation mode: sparse text, find as much as possible
pub const DEFAULT_PSM: u8 = 11;

/// OCR adapter error types
#[derive(Debug, Error)]
pub enum OcrError {
    #[error("tesseract binary not found (looked for '{0}')")]
    EngineNotFound(String),

    #[error("tesseract failed: {0}")]
    EngineFailed(String),

    #[error("Image not found: {0}")]
    ImageNotFound(PathBuf),

    #[error("Cannot read image {path}: {reason}")]
    ImageUnreadable { path: PathBuf, reason: String },

    #[error("Image is not square: {width}x{height} (crop the puzzle to a square first)")]
    NotSquare { width: u32, height: u32 },

    #[error(transparent)]
    Grid(#[from] GridError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, OcrError>;

/// Options for a Tesseract run
#[derive(Debug, Clone)]
pub struct TesseractOptions {
    /// Binary name or explicit path
    pub binary: String,
    /// Page segmentation mode passed as `--psm`
    pub psm: u8,
}

impl Default for TesseractOptions {
    fn default() -> Self {
        Self {
            binary: "tesseract".to_string(),
            psm: DEFAULT_PSM,
        }
    }
}

/// Tesseract-backed observation source
pub struct TesseractEngine {
    binary: PathBuf,
    psm: u8,
}

impl TesseractEngine {
    /// Locate the tesseract binary and build an engine.
    ///
    /// Fails fast when the binary is missing so a batch run does not
    /// discover the problem once per image.
    pub fn new(options: &TesseractOptions) -> Result<Self> {
        let binary = which::which(&options.binary)
            .map_err(|_| OcrError::EngineNotFound(options.binary.clone()))?;
        Ok(Self {
            binary,
            psm: options.psm,
        })
    }

    /// Read the source image's geometry, rejecting non-square photos.
    pub fn read_geometry(image_path: &Path) -> Result<ImageGeometry> {
        if !image_path.exists() {
            return Err(OcrError::ImageNotFound(image_path.to_path_buf()));
        }
        let (width, height) =
            image::open(image_path)
                .map(|img| img.dimensions())
                .map_err(|e| OcrError::ImageUnreadable {
                    path: image_path.to_path_buf(),
                    reason: e.to_string(),
                })?;
        if width != height {
            return Err(OcrError::NotSquare { width, height });
        }
        Ok(ImageGeometry::new(width as f64)?)
    }

    /// Run OCR over one image and return the recorded pass.
    ///
    /// Invocation mirrors digit-only page scanning:
    /// `tesseract <img> stdout --psm N -c tessedit_char_whitelist=123456789 tsv`
    pub fn observe(&self, image_path: &Path) -> Result<ObservationSet> {
        let geometry = Self::read_geometry(image_path)?;

        let output = Command::new(&self.binary)
            .arg(image_path)
            .arg("stdout")
            .arg("--psm")
            .arg(self.psm.to_string())
            .arg("-c")
            .arg(format!("tessedit_char_whitelist={}", DIGIT_WHITELIST))
            .arg("tsv")
            .output()?;

        if !output.status.success() {
            return Err(OcrError::EngineFailed(
                String::from_utf8_lossy(&output.stderr).trim().to_string(),
            ));
        }

        let tsv = String::from_utf8_lossy(&output.stdout);
        let observations = parse_tsv(&tsv, geometry.edge_length());
        Ok(ObservationSet::new(geometry, observations))
    }
}

/// Parse Tesseract TSV output into normalized observations.
///
/// Word-level rows (level 5) carry `left top width height conf text` with
/// pixel coordinates and a top-left origin. The lower-left corner of each
/// box becomes the normalized Y-up origin: `y = 1 - (top + height) / edge`.
/// Rows with empty text or negative confidence (layout placeholders) are
/// skipped; everything recognized is kept, the digit filter runs later.
fn parse_tsv(tsv: &str, edge_length: f64) -> Vec<Observation> {
    let mut observations = Vec::new();

    for line in tsv.lines().skip(1) {
        let fields: Vec<&str> = line.split('\t').collect();
        if fields.len() < 12 {
            continue;
        }
        if fields[0] != "5" {
            continue;
        }

        let (Ok(left), Ok(top), Ok(_width), Ok(height)) = (
            fields[6].parse::<f64>(),
            fields[7].parse::<f64>(),
            fields[8].parse::<f64>(),
            fields[9].parse::<f64>(),
        ) else {
            continue;
        };
        let conf: f64 = fields[10].parse().unwrap_or(-1.0);
        let text = fields[11].trim();
        if conf < 0.0 || text.is_empty() {
            continue;
        }

        let origin = NormPoint::new(
            (left / edge_length).clamp(0.0, 1.0),
            (1.0 - (top + height) / edge_length).clamp(0.0, 1.0),
        );
        observations.push(Observation::new(origin, text));
    }

    observations
}
