mod controller;
mod driver;
mod errors;
mod picker;
mod random;
mod session;
pub mod types;

#[cfg(test)]
pub(crate) use random::coins;

pub use controller::{SubmitController, SubmitSessionHandle};
pub use errors::{Result, SubmitError};
pub use picker::{FilePicker, SimulatedPicker};
pub use random::{CoinFlip, ThreadRngFlip};
pub use types::{
    EndReason, SelectedFile, SessionSnapshot, SubmitConfig, SubmitEvent, UploadState,
};
