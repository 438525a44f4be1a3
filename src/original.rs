//! Holder of the pristine image captured at load time.

use std::sync::Arc;

use crate::buffer::PixelBuffer;
use crate::error::FilterError;

/// Owns the untouched source buffer for the lifetime of a loaded image.
///
/// The buffer is shared as `Arc` so recomputes, reset and compare can all
/// read it without copying; nothing but [`load`](Self::load) can replace it.
#[derive(Debug, Default, Clone)]
pub struct OriginalStateManager {
    pristine: Option<Arc<PixelBuffer>>,
}

impl OriginalStateManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the pristine image, returning a shared handle to it.
    pub fn load(&mut self, buffer: PixelBuffer) -> Arc<PixelBuffer> {
        let pristine = Arc::new(buffer);
        self.pristine = Some(Arc::clone(&pristine));
        pristine
    }

    pub fn pristine(&self) -> Option<&Arc<PixelBuffer>> {
        self.pristine.as_ref()
    }

    /// The pristine image, or `NoSource` before the first load.
    pub fn require(&self) -> Result<Arc<PixelBuffer>, FilterError> {
        self.pristine.clone().ok_or(FilterError::NoSource)
    }

    pub fn is_loaded(&self) -> bool {
        self.pristine.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_manager() {
        let manager = OriginalStateManager::new();
        assert!(!manager.is_loaded());
        assert_eq!(manager.require().unwrap_err(), FilterError::NoSource);
        assert!(manager.pristine().is_none());
    }

    #[test]
    fn test_load_shares_the_same_buffer() {
        let mut manager = OriginalStateManager::new();
        let handle = manager.load(PixelBuffer::filled(3, 2, [1, 2, 3, 4]).unwrap());

        assert!(Arc::ptr_eq(&handle, manager.pristine().unwrap()));
        assert!(Arc::ptr_eq(&handle, &manager.require().unwrap()));
        assert!(manager.is_loaded());
    }

    #[test]
    fn test_reload_replaces_pristine() {
        let mut manager = OriginalStateManager::new();
        let first = manager.load(PixelBuffer::filled(1, 1, [0, 0, 0, 255]).unwrap());
        manager.load(PixelBuffer::filled(2, 2, [9, 9, 9, 9]).unwrap());

        // Earlier handles stay valid and unchanged.
        assert_eq!(first.pixel(0, 0), Some([0, 0, 0, 255]));
        let current = manager.require().unwrap();
        assert_eq!((current.width(), current.height()), (2, 2));
        assert!(!Arc::ptr_eq(&first, &current));
    }
}
