pub mod activity;
pub mod runtime;
