pub(crate) const DEFAULT_USER_AGENT: &str = concat!("baton/", env!("CARGO_PKG_VERSION"));

pub(crate) const DEFAULT_REQUEST_TIMEOUT: &str = "30s";
