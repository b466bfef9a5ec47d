pub mod model;
pub mod snippets;
pub mod vocab;
