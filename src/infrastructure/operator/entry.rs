//! Concrete operator installed by the binary.

/// Implements every operator port on top of infrastructure wiring.
#[derive(Debug, Default, Clone, Copy)]
pub struct Operator;
