pub mod config;
pub mod embedding;
pub mod inference;
pub mod output;
pub mod retrieval;
pub mod runtime;

#[cfg(test)]
pub mod test_util;
