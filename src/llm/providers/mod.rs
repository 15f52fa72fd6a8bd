pub mod glean;

pub use glean::GleanProvider;
