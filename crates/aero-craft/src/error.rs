use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum CubeLookupError {
    #[error("drag cube table is not built for the current configuration")]
    NotBuilt,

    #[error("drag cube sampled with a non-finite direction or Mach number")]
    NonFiniteSample,

    #[error("element has no drag cubes")]
    Empty,
}
