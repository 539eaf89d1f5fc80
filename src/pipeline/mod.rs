// Pipeline orchestration — single-profile analysis and follower scans.

pub mod analyze;
pub mod followers;
