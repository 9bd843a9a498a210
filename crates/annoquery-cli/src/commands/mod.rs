pub mod check;
pub mod compile;
pub mod query_file;
pub mod query_loader;

#[cfg(test)]
mod compile_tests;
