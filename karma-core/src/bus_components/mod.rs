pub mod bootstrap;
pub mod dependencies;
pub mod handler;
pub mod messagebus;
