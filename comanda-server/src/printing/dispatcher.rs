//! Fan-out of receipt jobs to the configured printers
//!
//! Each configured device gets its own rendered copy and its own
//! outcome. One jammed or unplugged printer never blocks the others:
//! every send runs under a timeout and a transport failure only marks
//! that device as not ready.

use super::raster::RenderError;
use comanda_printer::{EscPosJob, NetworkPrinter, PrintError, Printer};
use image::RgbaImage;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use thiserror::Error;
use tracing::{info, warn};

/// Lines fed before the cut
const CUT_FEED_LINES: u8 = 4;

#[derive(Debug, Error)]
pub enum DeviceError {
    #[error("Device not ready")]
    NotReady,

    #[error("Render failed: {0}")]
    Render(#[from] RenderError),

    #[error("Print timed out after {0:?}")]
    Timeout(Duration),

    #[error("Transport failed: {0}")]
    Transport(String),
}

/// Result of sending one job to one device
#[derive(Debug)]
pub struct DispatchOutcome {
    pub device: String,
    pub result: Result<(), DeviceError>,
}

struct PrinterSlot<P> {
    name: String,
    printer: P,
    ready: AtomicBool,
}

/// Sends rendered receipts to every configured printer
pub struct PrintDispatcher<P: Printer> {
    slots: Vec<PrinterSlot<P>>,
    logo: Option<RgbaImage>,
    print_timeout: Duration,
}

impl PrintDispatcher<NetworkPrinter> {
    /// Probe the configured endpoints and build a dispatcher
    ///
    /// Unreachable devices are kept in the set as not ready; they get
    /// one re-probe per dispatch and rejoin once they answer. An
    /// endpoint that does not parse as `host:port` is a configuration
    /// error and fails detection outright.
    pub async fn detect(
        endpoints: &[String],
        print_timeout: Duration,
    ) -> Result<Self, PrintError> {
        let mut slots = Vec::with_capacity(endpoints.len());
        for endpoint in endpoints {
            let printer = NetworkPrinter::from_addr(endpoint)?;
            let online = printer.is_online().await;
            if online {
                info!(device = %endpoint, "Printer detected");
            } else {
                warn!(device = %endpoint, "Printer not responding, kept as not ready");
            }
            slots.push(PrinterSlot {
                name: endpoint.clone(),
                printer,
                ready: AtomicBool::new(online),
            });
        }

        Ok(Self {
            slots,
            logo: None,
            print_timeout,
        })
    }
}

impl<P: Printer> PrintDispatcher<P> {
    /// Build a dispatcher from existing printer handles, all ready
    pub fn from_handles(printers: Vec<(String, P)>, print_timeout: Duration) -> Self {
        let slots = printers
            .into_iter()
            .map(|(name, printer)| PrinterSlot {
                name,
                printer,
                ready: AtomicBool::new(true),
            })
            .collect();

        Self {
            slots,
            logo: None,
            print_timeout,
        }
    }

    /// Logo printed above every receipt
    pub fn with_logo(mut self, logo: RgbaImage) -> Self {
        self.logo = Some(logo);
        self
    }

    pub fn device_names(&self) -> Vec<String> {
        self.slots.iter().map(|s| s.name.clone()).collect()
    }

    pub fn ready_count(&self) -> usize {
        self.slots
            .iter()
            .filter(|s| s.ready.load(Ordering::SeqCst))
            .count()
    }

    /// Send one job to every device
    ///
    /// The render closure runs once per device so each copy can differ.
    /// Returns one outcome per device, in configuration order.
    pub async fn dispatch<F>(&self, render: F) -> Vec<DispatchOutcome>
    where
        F: Fn(&str) -> Result<RgbaImage, RenderError>,
    {
        let mut outcomes = Vec::with_capacity(self.slots.len());
        for slot in &self.slots {
            let result = self.dispatch_one(slot, &render).await;
            if let Err(e) = &result {
                warn!(device = %slot.name, error = %e, "Print failed");
            }
            outcomes.push(DispatchOutcome {
                device: slot.name.clone(),
                result,
            });
        }
        outcomes
    }

    async fn dispatch_one<F>(&self, slot: &PrinterSlot<P>, render: &F) -> Result<(), DeviceError>
    where
        F: Fn(&str) -> Result<RgbaImage, RenderError>,
    {
        if !slot.ready.load(Ordering::SeqCst) {
            // One re-probe per dispatch
            if slot.printer.is_online().await {
                info!(device = %slot.name, "Printer back online");
                slot.ready.store(true, Ordering::SeqCst);
            } else {
                return Err(DeviceError::NotReady);
            }
        }

        let receipt = render(&slot.name)?;

        let mut job = EscPosJob::new();
        job.center();
        if let Some(logo) = &self.logo {
            job.raster(logo);
        }
        job.raster(&receipt);
        job.cut_feed(CUT_FEED_LINES);
        let data = job.build();

        match tokio::time::timeout(self.print_timeout, slot.printer.print(&data)).await {
            Ok(Ok(())) => Ok(()),
            Ok(Err(e)) => {
                slot.ready.store(false, Ordering::SeqCst);
                Err(DeviceError::Transport(e.to_string()))
            }
            Err(_) => {
                slot.ready.store(false, Ordering::SeqCst);
                Err(DeviceError::Timeout(self.print_timeout))
            }
        }
    }
}
