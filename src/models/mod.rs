pub mod document;
pub mod loaders;
pub mod record;
pub mod section;

pub use document::DocumentModel;
pub use loaders::{load_person_file, PersonFile};
pub use record::{CategoryRecord, PersonalRecord};
pub use section::{Column, ColumnSource, SectionKey, SectionLayout};
