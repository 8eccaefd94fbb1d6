pub mod billing;
pub mod member;
pub mod membership;
pub mod payment;
pub mod plan;
pub mod report;

pub use member::*;
pub use membership::*;
pub use payment::*;
pub use plan::*;
pub use report::*;
