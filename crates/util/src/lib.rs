pub mod blob_store;
pub mod date_handling;
pub mod notification_store;
pub mod path_processing;
pub mod preferences;

pub use blob_store::{BlobStore, BlobStoreError, InMemoryBlobStore, JsonFileBlobStore, open_or_in_memory};
pub use date_handling::{format_absolute_date, relative_age};
pub use notification_store::{NotificationStore, ReseedPolicy, seed_notifications};
pub use path_processing::{app_file_path, expand_tilde};
pub use preferences::{PreferencesError, UserPreferences};
