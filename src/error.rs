//! Central error handling for raypick queries
//!
//! Provides a unified PickError enum with consistent categorization
//! shared by the instance store, query service, and scene context.

/// Centralized error type for all picking operations
#[derive(thiserror::Error, Debug)]
pub enum PickError {
    #[error("Instance id {id} out of range (store holds {count} instances)")]
    InstanceOutOfRange { id: u32, count: u32 },

    #[error("Camera state is uninitialized; call set_camera before unprojecting")]
    CameraUninitialized,

    #[error("Invalid viewport: {0}")]
    InvalidViewport(String),
}

impl PickError {
    /// Convenience constructor for out-of-range instance lookups
    pub fn out_of_range(id: u32, count: u32) -> Self {
        PickError::InstanceOutOfRange { id, count }
    }

    pub fn viewport<T: ToString>(msg: T) -> Self {
        PickError::InvalidViewport(msg.to_string())
    }
}

/// Result type alias for picking operations
pub type PickResult<T> = Result<T, PickError>;
