pub(crate) mod auth;
pub(crate) mod inspect;
pub(crate) mod scripts;
pub(crate) mod status;
