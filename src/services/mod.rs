pub mod agent;
pub mod ai;
pub mod hotel;
pub mod session;
