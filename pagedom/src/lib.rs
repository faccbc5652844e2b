pub mod element;
pub mod event;
pub mod query;
pub mod render;

pub use element::{Content, Element};
pub use event::Event;
pub use query::{query_all, query_first, query_ids, Selector};
pub use render::to_html;
