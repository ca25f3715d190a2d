mod common;
mod performance;
mod portfolio;
