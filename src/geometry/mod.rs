pub(crate) mod builder;
pub(crate) mod config;
pub(crate) mod constrain;
pub(crate) mod path;
pub(crate) mod smooth;
