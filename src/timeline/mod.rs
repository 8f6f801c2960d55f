pub(crate) mod frames;
pub(crate) mod layers;
pub(crate) mod model;
