pub mod convert;
pub mod train;
pub mod validate;
