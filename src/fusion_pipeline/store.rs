//! Latest-frame store shared by the two notification handlers.
//!
//! Only the newest camera frame is kept. Writers swap in a new `Arc` under a
//! short lock; readers clone the handle, so a fusion cycle keeps working on
//! the frame it started with even if a newer one lands meanwhile.

use std::sync::{Arc, Mutex, MutexGuard};

use crate::fusion_pipeline::frame::types::CameraFrame;

#[derive(Debug)]
pub struct FrameStore {
    camera: Mutex<Arc<CameraFrame>>,
}

impl FrameStore {
    /// Store seeded with an all-black camera frame of the given size.
    pub fn new(width: u32, height: u32) -> Self {
        Self::with_camera(CameraFrame::blank(width, height))
    }

    pub fn with_camera(frame: CameraFrame) -> Self {
        Self {
            camera: Mutex::new(Arc::new(frame)),
        }
    }

    // The guarded value is a whole `Arc` at all times; poisoning is ignored.
    fn lock(&self) -> MutexGuard<'_, Arc<CameraFrame>> {
        self.camera.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn camera(&self) -> Arc<CameraFrame> {
        Arc::clone(&self.lock())
    }

    pub fn replace_camera(&self, frame: CameraFrame) {
        *self.lock() = Arc::new(frame);
    }
}
