pub mod bootstrap;
pub mod notifier;
