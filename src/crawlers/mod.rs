pub mod fetch;
pub mod web;
