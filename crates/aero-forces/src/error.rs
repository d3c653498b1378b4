use aero_craft::CubeLookupError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AeroError {
    #[error("non-finite {what} passed to the force model")]
    NonFiniteInput { what: &'static str },

    #[error("drag cube lookup for element `{element}` failed after a rebuild: {source}")]
    DragCube {
        element: String,
        #[source]
        source: CubeLookupError,
    },
}
