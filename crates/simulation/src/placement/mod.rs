pub mod controller;
pub mod errors;
pub mod signals;

pub use controller::PlacementController;
pub use errors::PlacementError;
pub use signals::{InformationType, PlacementSignal};

#[cfg(test)]
mod tests;
