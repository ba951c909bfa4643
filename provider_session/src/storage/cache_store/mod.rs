mod config;
mod memory;
mod redis;
mod types;

pub(crate) use config::SESSION_CACHE_STORE;
