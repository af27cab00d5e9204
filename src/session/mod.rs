pub(crate) mod job;
pub(crate) mod progress;
pub(crate) mod run;
