pub mod api;
pub mod commands;
pub mod guidance;
pub mod http;
pub mod report;
pub mod retry;
pub mod runtime;
pub mod speech;
pub mod state;
pub mod storage;
