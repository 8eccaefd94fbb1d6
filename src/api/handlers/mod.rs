pub mod members;
pub mod memberships;
pub mod payments;
pub mod plans;
pub mod reports;
pub mod root;
pub mod screenshots;
