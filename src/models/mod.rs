pub mod galleries;
pub mod photos;
