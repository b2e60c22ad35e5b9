pub mod fetch;
pub mod serve;
