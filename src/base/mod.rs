//! Implements the base structures shared by all analyses

mod constants;
mod control;
mod enums;
mod loads;
mod sections;
pub use crate::base::constants::*;
pub use crate::base::control::*;
pub use crate::base::enums::*;
pub use crate::base::loads::*;
pub use crate::base::sections::*;
