//! Platform abstraction layer
//!
//! The camera and the hand-landmark model are external capabilities. The
//! game core only sees the [`HandTrackingCapability`] trait:
//! - `start` kicks off (asynchronous) acquisition; completion is reported
//!   back through `App::camera_started` / `App::camera_failed`
//! - `stop` stops frame delivery and releases the device
//!
//! Frames themselves flow in through `App::handle_hand_results`.

#[cfg(target_arch = "wasm32")]
pub mod web;

use thiserror::Error;

/// Camera / model acquisition failures. Never fatal to the game.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CapabilityError {
    /// The user (or browser policy) refused camera access
    #[error("camera permission denied")]
    PermissionDenied,
    /// No camera, camera busy, or the stream failed to start
    #[error("camera unavailable: {0}")]
    DeviceUnavailable(String),
    /// The landmark model runtime is not present on the page
    #[error("hand tracking runtime not loaded")]
    NotLoaded,
}

impl CapabilityError {
    /// Map a DOMException name/message from getUserMedia
    pub fn from_dom_error(name: &str, message: &str) -> Self {
        match name {
            "NotAllowedError" | "PermissionDeniedError" => CapabilityError::PermissionDenied,
            _ if message.is_empty() => CapabilityError::DeviceUnavailable(name.to_string()),
            _ => CapabilityError::DeviceUnavailable(format!("{name}: {message}")),
        }
    }

    /// Text shown in the camera panel
    pub fn user_message(&self) -> &'static str {
        match self {
            CapabilityError::PermissionDenied => "Permission denied. Please allow camera access.",
            CapabilityError::DeviceUnavailable(_) | CapabilityError::NotLoaded => {
                "Camera failed to start."
            }
        }
    }
}

/// External camera + hand-landmark capability
pub trait HandTrackingCapability {
    /// Begin acquiring the camera and model
    ///
    /// An `Err` here is a synchronous failure; asynchronous failures are
    /// reported later through the app's completion signal.
    fn start(&mut self) -> Result<(), CapabilityError>;

    /// Stop frame delivery and release the device. Idempotent.
    fn stop(&mut self);

    /// Whether the capability currently holds the device
    fn is_running(&self) -> bool;
}

/// In-process capability for native runs and tests
///
/// Starts instantly (or fails with the configured error) and counts
/// start/stop calls so lifecycle handling can be checked.
#[derive(Debug, Clone, Default)]
pub struct ScriptedCapability {
    running: bool,
    fail_with: Option<CapabilityError>,
    pub starts: u32,
    pub stops: u32,
}

impl ScriptedCapability {
    pub fn new() -> Self {
        Self::default()
    }

    /// A capability whose every start fails with `err`
    pub fn failing(err: CapabilityError) -> Self {
        Self {
            fail_with: Some(err),
            ..Self::default()
        }
    }

    /// Make subsequent starts succeed
    pub fn allow(&mut self) {
        self.fail_with = None;
    }
}

impl HandTrackingCapability for ScriptedCapability {
    fn start(&mut self) -> Result<(), CapabilityError> {
        self.starts += 1;
        if let Some(err) = &self.fail_with {
            return Err(err.clone());
        }
        self.running = true;
        Ok(())
    }

    fn stop(&mut self) {
        if self.running {
            self.stops += 1;
        }
        self.running = false;
    }

    fn is_running(&self) -> bool {
        self.running
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dom_error_mapping() {
        assert_eq!(
            CapabilityError::from_dom_error("NotAllowedError", "denied"),
            CapabilityError::PermissionDenied
        );
        assert_eq!(
            CapabilityError::from_dom_error("PermissionDeniedError", ""),
            CapabilityError::PermissionDenied
        );
        assert_eq!(
            CapabilityError::from_dom_error("NotFoundError", "no device"),
            CapabilityError::DeviceUnavailable("NotFoundError: no device".into())
        );
        assert_eq!(
            CapabilityError::from_dom_error("NotReadableError", ""),
            CapabilityError::DeviceUnavailable("NotReadableError".into())
        );
    }

    #[test]
    fn test_user_messages() {
        assert_eq!(
            CapabilityError::PermissionDenied.user_message(),
            "Permission denied. Please allow camera access."
        );
        assert_eq!(
            CapabilityError::NotLoaded.user_message(),
            "Camera failed to start."
        );
    }

    #[test]
    fn test_scripted_lifecycle() {
        let mut cap = ScriptedCapability::new();
        assert!(cap.start().is_ok());
        assert!(cap.is_running());
        cap.stop();
        cap.stop();
        assert!(!cap.is_running());
        assert_eq!((cap.starts, cap.stops), (1, 1));

        let mut broken = ScriptedCapability::failing(CapabilityError::PermissionDenied);
        assert_eq!(broken.start(), Err(CapabilityError::PermissionDenied));
        assert!(!broken.is_running());
    }
}
