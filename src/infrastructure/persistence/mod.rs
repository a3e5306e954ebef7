mod memory_entry_store;

pub use memory_entry_store::InMemoryEntryStore;
