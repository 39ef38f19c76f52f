//! ESC/POS job builder
//!
//! Builds the byte stream for one print job: initialize, align, raster
//! images (GS v 0), feed and cut. Receipts here are raster images, not
//! text, so there is no character encoding step.

use image::RgbaImage;

/// Widest raster the print head can take (80mm head, 72mm printable).
pub const MAX_RASTER_WIDTH: u32 = 576;

/// Luma threshold below which a pixel prints black.
const BLACK_THRESHOLD: u8 = 128;

/// ESC/POS print job builder
///
/// Accumulates commands for a single job. The job is self-contained:
/// it starts with a printer reset so leftover state from a failed job
/// on the same device cannot leak in.
pub struct EscPosJob {
    buf: Vec<u8>,
}

impl EscPosJob {
    /// Create a new job, starting with printer initialization (ESC @)
    pub fn new() -> Self {
        let mut buf = Vec::with_capacity(8192);
        buf.extend_from_slice(&[0x1B, 0x40]);
        Self { buf }
    }

    // === Alignment ===

    /// Align to center
    pub fn center(&mut self) -> &mut Self {
        self.buf.extend_from_slice(&[0x1B, 0x61, 0x01]);
        self
    }

    /// Align to left (default)
    pub fn left(&mut self) -> &mut Self {
        self.buf.extend_from_slice(&[0x1B, 0x61, 0x00]);
        self
    }

    // === Raster Images ===

    /// Append an image as GS v 0 raster data
    ///
    /// The image is converted to 1-bit monochrome by luminance threshold;
    /// transparent pixels stay white. Images wider than
    /// [`MAX_RASTER_WIDTH`] are scaled down to fit the head.
    pub fn raster(&mut self, img: &RgbaImage) -> &mut Self {
        let (w, h) = img.dimensions();

        let scaled;
        let img = if w > MAX_RASTER_WIDTH {
            let ratio = MAX_RASTER_WIDTH as f64 / w as f64;
            let new_h = (h as f64 * ratio) as u32;
            scaled = image::imageops::resize(
                img,
                MAX_RASTER_WIDTH,
                new_h.max(1),
                image::imageops::FilterType::Nearest,
            );
            &scaled
        } else {
            img
        };

        let (w, h) = img.dimensions();
        let x_bytes = w.div_ceil(8);

        // GS v 0 m xL xH yL yH
        self.buf.extend_from_slice(&[0x1D, 0x76, 0x30, 0x00]);
        self.buf.push(x_bytes as u8);
        self.buf.push((x_bytes >> 8) as u8);
        self.buf.push(h as u8);
        self.buf.push((h >> 8) as u8);

        for y in 0..h {
            for x_byte in 0..x_bytes {
                let mut byte = 0u8;
                for bit in 0..8 {
                    let x = x_byte * 8 + bit;
                    if x < w {
                        let pixel = img.get_pixel(x, y);

                        // Transparent pixels stay white
                        let alpha = pixel[3];
                        if alpha >= 128 {
                            let luma = (0.299 * pixel[0] as f32
                                + 0.587 * pixel[1] as f32
                                + 0.114 * pixel[2] as f32)
                                as u8;

                            if luma < BLACK_THRESHOLD {
                                byte |= 1 << (7 - bit);
                            }
                        }
                    }
                }
                self.buf.push(byte);
            }
        }

        // Newline after image
        self.buf.push(0x0A);
        self
    }

    // === Paper Control ===

    /// Write empty lines
    pub fn feed(&mut self, lines: u8) -> &mut Self {
        // ESC d n - Print and feed n lines
        self.buf.extend_from_slice(&[0x1B, 0x64, lines]);
        self
    }

    /// Full cut with feed — feeds n lines then cuts.
    /// Uses GS V 66 n, which lets the printer manage cutter-to-head distance.
    pub fn cut_feed(&mut self, lines: u8) -> &mut Self {
        self.buf.extend_from_slice(&[0x1D, 0x56, 0x42, lines]);
        self
    }

    /// Full cut without extra feed
    pub fn cut(&mut self) -> &mut Self {
        // GS V 0 - Full cut
        self.buf.extend_from_slice(&[0x1D, 0x56, 0x00]);
        self
    }

    // === Build ===

    /// Build the final byte buffer
    pub fn build(self) -> Vec<u8> {
        self.buf
    }
}

impl Default for EscPosJob {
    fn default() -> Self {
        Self::new()
    }
}
