//! Storage Adapters

mod content_copier;

pub use content_copier::FsContentCopier;
