pub mod offset;
pub mod query;
pub mod relax;
