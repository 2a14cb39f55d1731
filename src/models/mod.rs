pub mod photo_record;
pub mod quote;
pub mod selection;
pub mod settings;

pub use photo_record::PhotoRecord;
pub use quote::{QuoteCategory, QuoteRecord};
pub use selection::{Selectable, SelectionCache, SelectionKind};
pub use settings::{FontSize, Settings, Theme};
