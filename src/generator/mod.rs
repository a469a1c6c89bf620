pub mod branch;
pub mod builder;
pub mod interpolator;
pub mod recursive;
