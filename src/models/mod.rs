pub mod company;
pub mod event;
pub mod insight;
pub mod message;
pub mod report;
pub mod ship;
pub mod telemetry;
pub mod voyage;
