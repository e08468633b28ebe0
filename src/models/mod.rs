mod role;
mod role_row;

pub use role::*;
pub use role_row::*;
