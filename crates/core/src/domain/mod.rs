pub mod agent;
pub mod customer;
pub mod support;
pub mod ticket;
