pub mod cache;
pub mod database;
pub mod messaging;
pub mod offline;
pub mod remote;
pub mod storage;
