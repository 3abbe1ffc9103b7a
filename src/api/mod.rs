pub mod client;
pub mod error;
#[cfg(test)]
pub mod testing;
pub mod types;

pub use client::{RechargeApi, RechargeClient};
pub use error::ApiError;
pub use types::{RechargeRequest, StatusResponse, SubmitResponse, TaskId, TaskStatus};
