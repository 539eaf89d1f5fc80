// TrustLens: profile risk and account-age estimation for Instagram-like accounts
//
// This is the library root. Analyzers (contact, bio, age, impersonation,
// scoring) are pure functions over fetched records; upstream and archive
// hold the network collaborators; pipeline wires them together.

pub mod age;
pub mod archive;
pub mod bio;
pub mod config;
pub mod contact;
pub mod impersonation;
pub mod output;
pub mod pipeline;
pub mod profile;
pub mod scoring;
pub mod upstream;
