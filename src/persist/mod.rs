pub(crate) mod migrate;
pub(crate) mod schema;
pub(crate) mod storage;
