//! # qrforge
//!
//! A Rust library for encoding text payloads into QR Code symbols (model 2, versions 1-40)
//! with Reed-Solomon error correction and automatic mask selection.
//!
//! ## Features
//!
//! - **Mode Selection**: Picks the densest of numeric, alphanumeric and byte mode for the payload
//! - **Version Selection**: Finds the smallest version that holds the payload, or uses a forced one
//! - **Reed-Solomon Error Correction**: Per-block error correction at levels L, M, Q and H
//! - **Mask Selection**: Scores all eight mask patterns and keeps the least penalised symbol
//!
//! ## Quick Start
//!
//! ```rust
//! use qrforge::{encode, ECLevel};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let qr = encode(b"HELLO WORLD", ECLevel::Q)?;
//! assert_eq!(qr.width(), 21);
//!
//! for row in qr.rows() {
//!     let line = row.iter().map(|c| c.select("##", "  ")).collect::<String>();
//!     println!("{line}");
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Full Configuration
//!
//! ```rust
//! use std::sync::Arc;
//!
//! use qrforge::{ECLevel, GaloisField, MaskPattern, QRBuilder, Sizing, Version};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let field = Arc::new(GaloisField::new());
//! let qr = QRBuilder::new(b"Hello, World!")
//!     .version(Version::new(2)?)      // if not provided, finds the smallest version to fit data
//!     .ec_level(ECLevel::M)           // if not provided, defaults to ECLevel::M
//!     .mask(MaskPattern::new(3)?)     // if not provided, finds the best mask by penalty score
//!     .sizing(Sizing::Exact)          // only used when the version is not provided
//!     .field(field)                   // shared across builds, built per call if not provided
//!     .build()?;
//!
//! assert_eq!(qr.metadata().to_string(), "{ Version: 2, Ec level: M, Mask: 3 }");
//! # Ok(())
//! # }
//! ```
//!
//! ### Error Correction Levels
//! - **L (Low)**: ~7% error correction
//! - **M (Medium)**: ~15% error correction
//! - **Q (Quartile)**: ~25% error correction
//! - **H (High)**: ~30% error correction

#![allow(clippy::items_after_test_module)]

pub mod builder;
pub(crate) mod common;

pub use builder::{encode, QRBuilder, QR};
pub use common::codec::Sizing;
pub use common::ec::GaloisField;
pub use common::error::{QRError, QRResult};
pub use common::mask::MaskPattern;
pub use common::metadata::{Color, ECLevel, Metadata, Version};
