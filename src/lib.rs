pub mod cli;
pub mod context;
pub mod executor;
pub mod probe;
pub mod ui;
pub mod workflow;

#[cfg(test)]
pub(crate) mod test_support;
