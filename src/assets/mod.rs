pub(crate) mod color;
pub(crate) mod font;
pub(crate) mod template;
