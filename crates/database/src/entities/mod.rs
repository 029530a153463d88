//! Domain entities stored by the persistence layer

pub mod bill;
pub mod group;
pub mod item;
pub mod member;

pub use bill::{Bill, BillWithItems, CreateBillRequest};
pub use group::{CreateGroupRequest, Group, GroupWithMembers};
pub use item::{CreateItemRequest, Item};
pub use member::{CreateMemberRequest, Member};
