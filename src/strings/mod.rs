pub mod help;
pub mod messages;
