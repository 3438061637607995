pub(crate) mod pipeline;
pub(crate) mod svg;
pub(crate) mod trace;
