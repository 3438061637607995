pub(crate) mod backend;
pub(crate) mod camera;
pub(crate) mod cpu;
pub(crate) mod target;
