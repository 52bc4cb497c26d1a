pub mod poller;
pub mod registry;
pub mod retry;
pub mod router;
