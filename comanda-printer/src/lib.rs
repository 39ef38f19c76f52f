//! # comanda-printer
//!
//! ESC/POS thermal printer library - low-level printing capabilities only.
//!
//! ## Scope
//!
//! This crate handles HOW to print:
//! - ESC/POS job building (init, alignment, raster images, paper cut)
//! - Raster encoding of in-memory images (GS v 0)
//! - Network printing (TCP port 9100) with bounded timeouts
//!
//! Business logic (WHAT to print) stays in application code: receipt
//! layout and rasterization live in comanda-server.
//!
//! ## Example
//!
//! ```ignore
//! use comanda_printer::{EscPosJob, NetworkPrinter, Printer};
//!
//! let mut job = EscPosJob::new();
//! job.center();
//! job.raster(&receipt_image);
//! job.cut_feed(4);
//!
//! let printer = NetworkPrinter::new("192.168.1.100", 9100)?;
//! printer.print(&job.build()).await?;
//! ```

mod error;
mod escpos;
mod printer;

// Re-exports
pub use error::{PrintError, PrintResult};
pub use escpos::{EscPosJob, MAX_RASTER_WIDTH};
pub use printer::{NetworkPrinter, Printer};
