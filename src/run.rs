use crate::bitbucket::query::HttpQueryRunner;
use crate::config::{self, Credentials};
use crate::output::Console;
use crate::report;

/// How a run ended, short of an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Completed,
    MissingCredentials,
}

impl Outcome {
    pub fn exit_code(self) -> u8 {
        match self {
            Outcome::Completed => 0,
            Outcome::MissingCredentials => 1,
        }
    }
}

/// Loads credentials through `lookup` and writes the issue report to `console`.
///
/// Without credentials the usage hint goes to the error stream and no request
/// is made. `api_base` replaces the Bitbucket API root when given.
pub async fn run<F>(
    lookup: F,
    api_base: Option<&str>,
    console: &mut Console<'_>,
) -> anyhow::Result<Outcome>
where
    F: Fn(&str) -> Option<String>,
{
    let credentials = match Credentials::load(lookup) {
        Ok(credentials) => credentials,
        Err(err) => {
            tracing::debug!(%err, "credentials unavailable");
            for line in config::USAGE_LINES {
                console.eprintln(line)?;
            }
            return Ok(Outcome::MissingCredentials);
        }
    };

    let mut runner = anyhow::Context::context(
        HttpQueryRunner::new(credentials),
        "Failed to create HTTP client",
    )?;
    if let Some(api_base) = api_base {
        runner = runner.with_api_base(api_base);
    }

    report::write_report(&runner, console).await?;
    Ok(Outcome::Completed)
}
