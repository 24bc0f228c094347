mod builder;
mod lowering;

pub use builder::RegistryBuilder;
