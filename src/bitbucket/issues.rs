use crate::bitbucket::query::{Query, QueryError, QueryRunner};
use serde::Deserialize;
use serde_json::Value;
use std::fmt::Display;

/// Web root used for issue deep links.
pub const WEB_BASE_URL: &str = "https://bitbucket.org";

/// Issues with this status are never reported.
pub const RESOLVED_STATUS: &str = "resolved";

/// A repository identified by its owner and slug.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RepositoryRef {
    pub owner: String,
    pub slug: String,
}

/// Bitbucket's issue priority labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Trivial,
    Minor,
    Major,
    Critical,
    Blocker,
    #[serde(other)]
    Unknown,
}

/// An unresolved issue ready to be reported.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Issue {
    pub id: u64,
    pub title: String,
    pub priority: Priority,
    pub url: String,
}

#[derive(Debug, Deserialize)]
struct IssueEntry {
    local_id: u64,
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    priority: Option<Priority>,
    status: String,
}

#[derive(Debug, Deserialize)]
struct IssuesResponse {
    issues: Vec<IssueEntry>,
}

/// Splits the repository listing, a JSON array, into its raw entries.
///
/// Entries are decoded one at a time with [`parse_repository`] so a bad entry
/// only surfaces once the report reaches it.
pub fn repository_entries(value: Value) -> Result<Vec<Value>, serde_json::Error> {
    serde_json::from_value(value)
}

/// Decodes one listing entry, an object with `owner` and `slug`.
pub fn parse_repository(entry: Value) -> Result<RepositoryRef, serde_json::Error> {
    serde_json::from_value(entry)
}

/// Deep link to an issue in the Bitbucket web UI.
///
/// ```
/// use bb_issues::bitbucket::issues::make_issue_url;
///
/// assert_eq!(
///     make_issue_url("scraperwikids", "my_repo", "11"),
///     "https://bitbucket.org/scraperwikids/my_repo/issue/11"
/// );
/// ```
pub fn make_issue_url(owner: &str, slug: &str, id: impl Display) -> String {
    format!("{WEB_BASE_URL}/{owner}/{slug}/issue/{id}")
}

/// Single-pass iterator over the unresolved issues of one repository,
/// in the order the API returned them.
#[derive(Debug)]
pub struct OpenIssues {
    owner: String,
    slug: String,
    entries: std::vec::IntoIter<IssueEntry>,
}

impl Iterator for OpenIssues {
    type Item = Issue;

    fn next(&mut self) -> Option<Issue> {
        let entry = self
            .entries
            .by_ref()
            .find(|entry| entry.status != RESOLVED_STATUS)?;
        Some(Issue {
            url: make_issue_url(&self.owner, &self.slug, entry.local_id),
            id: entry.local_id,
            title: entry.title.unwrap_or_default(),
            priority: entry.priority.unwrap_or(Priority::Unknown),
        })
    }
}

/// Decodes an issue listing (an object with an `issues` array) into its unresolved issues.
pub fn open_issues(owner: &str, slug: &str, value: Value) -> Result<OpenIssues, serde_json::Error> {
    let response: IssuesResponse = serde_json::from_value(value)?;
    Ok(OpenIssues {
        owner: owner.to_string(),
        slug: slug.to_string(),
        entries: response.issues.into_iter(),
    })
}

/// Outcome of looking up a repository's issues.
#[derive(Debug)]
pub enum IssueList {
    Found(OpenIssues),
    /// The issue list does not exist or is not accessible.
    NotFound { url: String },
}

/// Fetches the unresolved issues of `repo`.
///
/// A 404 from the API becomes `IssueList::NotFound`; every other failure is
/// returned as an error.
pub async fn fetch_issues<R: QueryRunner>(
    runner: &R,
    repo: &RepositoryRef,
) -> Result<IssueList, QueryError> {
    let query = Query::Issues {
        owner: repo.owner.clone(),
        slug: repo.slug.clone(),
    };
    match runner.run_query(&query).await {
        Ok(value) => Ok(IssueList::Found(open_issues(&repo.owner, &repo.slug, value)?)),
        Err(QueryError::NotFound { url }) => {
            tracing::info!(%url, "issue list not found, skipping repository");
            Ok(IssueList::NotFound { url })
        }
        Err(err) => Err(err),
    }
}
