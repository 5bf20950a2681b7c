mod approval;
mod authority;
mod milestone;
mod sow;
mod user;
mod vendor;

pub use approval::*;
pub use authority::*;
pub use milestone::*;
pub use sow::*;
pub use user::*;
pub use vendor::*;
