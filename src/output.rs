//! Adapter from `smart-leds` writers to [`OutputDriver`]

use smart_leds::SmartLedsWrite;

#[cfg(feature = "esp32-log")]
use esp_println::println;

use crate::OutputDriver;
use crate::color::Rgb;

/// Drives any `SmartLedsWrite` implementation (WS2812 over RMT, SPI, PIO...)
///
/// Write errors drop the frame; the next flush sends a complete frame again.
pub struct SmartLedsOutput<W> {
    writer: W,
    failed_writes: u32,
}

impl<W> SmartLedsOutput<W>
where
    W: SmartLedsWrite<Color = Rgb>,
{
    pub const fn new(writer: W) -> Self {
        Self {
            writer,
            failed_writes: 0,
        }
    }

    /// Number of frames the writer rejected so far
    pub const fn failed_writes(&self) -> u32 {
        self.failed_writes
    }

    /// Give the writer back
    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W> OutputDriver for SmartLedsOutput<W>
where
    W: SmartLedsWrite<Color = Rgb>,
{
    fn write(&mut self, colors: &[Rgb]) {
        if self.writer.write(colors.iter().copied()).is_err() {
            self.failed_writes = self.failed_writes.wrapping_add(1);
            #[cfg(feature = "esp32-log")]
            println!(
                "[SmartLedsOutput.write] hardware write failed ({} so far)",
                self.failed_writes
            );
        }
    }
}
