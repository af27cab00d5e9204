pub(crate) mod backend;
pub(crate) mod batch;
pub(crate) mod cpu;
pub(crate) mod text;
