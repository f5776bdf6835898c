pub mod engine;
pub mod protocol;
pub mod session;
pub mod save_store;

pub mod prompt_builder;
pub mod llm_client;
pub mod narrator;

#[cfg(test)]
pub mod test_support;
