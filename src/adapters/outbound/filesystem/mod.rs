/// Filesystem adapters for file I/O operations
mod directory_package_source;
mod file_reader;
mod file_writer;

pub use directory_package_source::{DirectoryPackageSource, CACHE_SOURCE_NAME};
pub use file_reader::{FileSystemReader, DEFAULT_RESTORE_LOCK};
pub use file_writer::FileSystemWriter;
