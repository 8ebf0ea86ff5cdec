pub mod cli;
pub mod consts;
pub mod core;

pub use self::core::report::Reporter;
pub use self::core::run;
