pub mod mapping;
pub mod recommendation;
pub mod ticket;
