mod common;
mod mapping;
