//! In-memory implementations of the ports, for development and tests.

pub mod inmem_repos;
pub mod inmem_store;

pub use inmem_repos::{
    InMemoryAccounts, InMemoryApplications, InMemoryCollaborations, InMemoryContributors,
    InMemoryProjects,
};
pub use inmem_store::InMemoryEventStore;
