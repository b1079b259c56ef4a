pub mod category;
pub mod content_store;
pub mod media_item;

pub use category::*;
pub use content_store::*;
pub use media_item::*;
