pub(crate) mod access;
pub(crate) mod files;
pub(crate) mod org;
pub(crate) mod repo;
pub(crate) mod shared;
