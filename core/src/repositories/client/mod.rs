mod r#trait;

pub use r#trait::ClientDirectory;

#[cfg(test)]
pub mod mock;
#[cfg(test)]
pub use mock::MockClientDirectory;
