pub mod common;
mod api_callers;
