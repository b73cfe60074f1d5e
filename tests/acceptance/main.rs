use bb_issues::run::Outcome;
use cucumber::World;
use std::collections::HashMap;

#[derive(Debug, Default, World)]
pub struct ReportWorld {
    pub env: HashMap<String, String>,
    pub server: Option<stub_server::StubServer>,
    pub captured_output: Vec<u8>,
    pub captured_error: Vec<u8>,
    pub outcome: Option<Result<Outcome, String>>,
}

#[tokio::main]
async fn main() {
    ReportWorld::run("features").await;
}

mod stub_server;
