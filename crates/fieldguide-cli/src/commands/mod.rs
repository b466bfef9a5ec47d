pub mod ask;
pub mod identify;
pub mod model;
pub mod search;
pub mod snippets;
