pub mod collection;
pub mod network;
pub mod query;
