pub mod fetch;
pub mod link;
pub mod route;
pub mod sync;
