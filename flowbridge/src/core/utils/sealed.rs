/// <sup>🔒</sup>
/// Sealed trait that can't be implemented outside the crate.
pub trait Sealed {}
