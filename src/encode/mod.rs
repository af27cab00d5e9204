pub(crate) mod archive;
pub(crate) mod naming;
pub(crate) mod sink;
