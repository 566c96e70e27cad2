pub mod surface;

pub use surface::{UploadPhase, UploadState, UploadSurface};
