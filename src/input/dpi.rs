//! Screen density shared between the dispatcher and its detectors.

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

/// Screen DPI cell, read on every touch event and written on screen changes.
///
/// Clones share the same value. Stored as the bit pattern of an `f32` so
/// reads never take a lock.
#[derive(Debug, Clone)]
pub struct ScreenDpi(Arc<AtomicU32>);

impl ScreenDpi {
    pub fn new(dpi: f32) -> Self {
        Self(Arc::new(AtomicU32::new(dpi.to_bits())))
    }

    /// Current DPI.
    pub fn get(&self) -> f32 {
        f32::from_bits(self.0.load(Ordering::Relaxed))
    }

    /// Replace the DPI. Non-finite and non-positive values are ignored.
    pub fn set(&self, dpi: f32) -> bool {
        if !(dpi.is_finite() && dpi > 0.0) {
            tracing::warn!("Ignoring invalid screen DPI {}", dpi);
            return false;
        }
        self.0.store(dpi.to_bits(), Ordering::Relaxed);
        true
    }

    /// Contact radius assumed when a device does not report one.
    pub fn default_pointer_size(&self) -> f32 {
        self.get() / 8.0
    }
}
