pub mod balance;
pub mod forward;
pub mod markets;
