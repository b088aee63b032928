mod file;
#[cfg(test)]
mod in_memory;

pub use file::FileStore;
#[cfg(test)]
pub use in_memory::InMemoryStore;
