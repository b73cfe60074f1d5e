use crate::bitbucket::issues::{self, Issue, IssueList, RepositoryRef};
use crate::bitbucket::query::{Query, QueryRunner};
use crate::output::Console;
use anyhow::{Context, Result};

pub const HTML_OPEN: &str = "<html><ul>";
pub const HTML_CLOSE: &str = "</ul></html>";

/// Renders one list item.
///
/// Owner, slug and title are inserted verbatim, without HTML escaping, so markup
/// in an issue title ends up in the page.
pub fn issue_html(repo: &RepositoryRef, issue: &Issue) -> String {
    format!(
        "<li>{owner}/{slug} <a href=\"{url}\">#{id} \"{title}\"</a></li>\n",
        owner = repo.owner,
        slug = repo.slug,
        url = issue.url,
        id = issue.id,
        title = issue.title,
    )
}

/// Writes the HTML list of unresolved issues across all of the user's repositories.
///
/// Progress and skipped repositories are reported on the error stream. Once the
/// opening tags are out, the closing tags are written even when a query fails;
/// the failure is returned afterwards.
pub async fn write_report<R: QueryRunner>(runner: &R, console: &mut Console<'_>) -> Result<()> {
    console.print(HTML_OPEN)?;
    let result = write_items(runner, console).await;
    console.print(HTML_CLOSE)?;
    result
}

async fn write_items<R: QueryRunner>(runner: &R, console: &mut Console<'_>) -> Result<()> {
    let listing = runner
        .run_query(&Query::Repository)
        .await
        .context("Failed to list repositories")?;
    let entries =
        issues::repository_entries(listing).context("Failed to parse repository list")?;
    tracing::debug!(count = entries.len(), "repositories listed");

    for entry in entries {
        let repo = issues::parse_repository(entry).context("Failed to parse repository entry")?;
        console.eprintln(&format!("{}/{}", repo.owner, repo.slug))?;

        let list = issues::fetch_issues(runner, &repo)
            .await
            .with_context(|| format!("Failed to fetch issues for {}/{}", repo.owner, repo.slug))?;
        match list {
            IssueList::Found(open) => {
                for issue in open {
                    console.print(&issue_html(&repo, &issue))?;
                }
            }
            IssueList::NotFound { url } => {
                console.eprintln(&format!("Not found: {url}"))?;
            }
        }
    }
    Ok(())
}
