pub mod controller;
pub mod distribute;
pub mod info;
pub mod report;
pub mod response;
