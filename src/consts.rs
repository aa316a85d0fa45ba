use crate::float::*;

#[cfg(not(feature = "single_precision"))]
pub use self::double::*;
#[cfg(feature = "single_precision")]
pub use self::single::*;

#[cfg(not(feature = "single_precision"))]
mod double {
    use super::*;

    pub const EPSILON: Float = 1e-10;
}

#[cfg(feature = "single_precision")]
mod single {
    use super::*;

    pub const EPSILON: Float = 1e-5;
}

/// Smallest polar angle of the view direction in degrees
pub const MIN_PHI: Float = 1.0;
/// Largest polar angle of the view direction in degrees
pub const MAX_PHI: Float = 179.0;
