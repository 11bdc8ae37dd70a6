// Domain layer - Timeline segmentation and time arithmetic

pub mod errors;
pub mod model;
pub mod rules;
