use thiserror::Error;

use crate::constraints::{Attribute, Item};

#[derive(Debug, Error)]
pub enum LayoutError {
    #[error("templated cells are laid out by their template")]
    Templated,
    #[error("no active constraint for {0:?}.{1:?}")]
    MissingConstraint(Item, Attribute),
    #[error("layout engine failed: {0}")]
    Taffy(#[from] taffy::TaffyError),
}
