pub mod bitbucket;
pub mod config;
pub mod output;
pub mod report;
pub mod run;
