pub(crate) mod undo;
