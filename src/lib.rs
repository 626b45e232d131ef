pub mod action;
pub mod api;
pub mod balance;
pub mod config;
pub mod context;
pub mod dispatch;
pub mod market;
pub mod model;
pub mod rpc;
pub mod units;
pub mod wallet;
