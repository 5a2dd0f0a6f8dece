pub mod entropy_request;
pub mod handle;
pub mod vesting_schedule;

pub use entropy_request::*;
pub use handle::*;
pub use vesting_schedule::*;
