pub mod diamond;
pub mod scenario;
pub mod shared;
