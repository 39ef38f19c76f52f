//! Receipt printing: layout, rasterization and device fan-out

pub mod dispatcher;
pub mod layout;
pub mod raster;

pub use dispatcher::{DeviceError, DispatchOutcome, PrintDispatcher};
pub use layout::{CopyKind, ReceiptLayout};
pub use raster::{ReceiptRenderer, RenderError};
