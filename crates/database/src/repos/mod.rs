//! Data access repositories

pub mod bill_repository;
pub mod group_repository;

pub use bill_repository::BillRepository;
pub use group_repository::GroupRepository;
