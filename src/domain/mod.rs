pub mod conversion;
pub mod simulation;
pub mod validation;
