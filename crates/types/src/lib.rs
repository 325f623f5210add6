pub mod date;
pub mod ids;
pub mod metadata;
pub mod page;

pub use date::{parse_date, parse_pdf_date, pdf_date, DateError};
pub use ids::{EngineId, ResourceKey};
pub use metadata::{convert_boolean_value, MetadataKey, MetadataValue};
pub use page::{PageSize, PageSizeError};
