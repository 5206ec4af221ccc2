pub mod fixture;
mod page_test;
