//! Optional external series: a GitHub contribution calendar or any URL that
//! serves a JSON array of numbers.
//!
//! Every failure (network, HTTP status, auth, payload shape, timeout) maps to
//! `Error::UpstreamUnavailable`. Nothing is retried.

use std::fmt;
use std::time::Duration;

use eqwave_core::error::{Error, Result};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::cli::Args;

const GITHUB_GRAPHQL: &str = "https://api.github.com/graphql";
const USER_AGENT: &str = concat!("eqwave/", env!("CARGO_PKG_VERSION"));

const CONTRIBUTIONS_QUERY: &str = "query($login: String!) { user(login: $login) { contributionsCollection { \
     contributionCalendar { weeks { contributionDays { contributionCount } } } } } }";

#[derive(Clone, Debug, PartialEq)]
pub enum UpstreamSource {
    Github { user: String, token: String },
    JsonUrl(String),
}

impl fmt::Display for UpstreamSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UpstreamSource::Github { user, .. } => write!(f, "github:{user}"),
            UpstreamSource::JsonUrl(url) => f.write_str(url),
        }
    }
}

impl UpstreamSource {
    /// Source selected by the flags, if any.
    pub fn from_args(args: &Args) -> Result<Option<Self>> {
        if let Some(user) = &args.github_user {
            let token = args
                .github_token
                .clone()
                .filter(|t| !t.trim().is_empty())
                .ok_or_else(|| Error::invalid("github_token", "--github-user needs --github-token or GITHUB_TOKEN"))?;
            return Ok(Some(Self::Github { user: user.clone(), token }));
        }
        Ok(args.series_url.clone().map(Self::JsonUrl))
    }

    /// Fetch the series, bounded by `timeout` overall.
    pub async fn fetch(&self, timeout: Duration) -> Result<Vec<f64>> {
        info!(source = %self, timeout_secs = timeout.as_secs(), "fetching upstream series");
        let series = match tokio::time::timeout(timeout, self.request(timeout)).await {
            Ok(r) => r?,
            Err(_) => return Err(Error::upstream(format!("{self} timed out after {}s", timeout.as_secs()))),
        };
        if series.is_empty() {
            return Err(Error::upstream(format!("{self} returned no data points")));
        }
        debug!(points = series.len(), "upstream series received");
        Ok(series)
    }

    async fn request(&self, timeout: Duration) -> Result<Vec<f64>> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()
            .map_err(unavailable)?;

        match self {
            UpstreamSource::Github { user, token } => {
                let body = GraphQlRequest { query: CONTRIBUTIONS_QUERY, variables: Variables { login: user } };
                let resp = client
                    .post(GITHUB_GRAPHQL)
                    .bearer_auth(token)
                    .json(&body)
                    .send()
                    .await
                    .and_then(reqwest::Response::error_for_status)
                    .map_err(unavailable)?;
                let text = resp.text().await.map_err(unavailable)?;
                contribution_counts(&text)
            }
            UpstreamSource::JsonUrl(url) => {
                let resp = client
                    .get(url)
                    .send()
                    .await
                    .and_then(reqwest::Response::error_for_status)
                    .map_err(unavailable)?;
                let text = resp.text().await.map_err(unavailable)?;
                parse_number_array(&text)
            }
        }
    }
}

fn unavailable(e: impl fmt::Display) -> Error {
    Error::upstream(e.to_string())
}

// ---- Payloads ----

#[derive(Serialize)]
struct GraphQlRequest<'a> {
    query: &'a str,
    variables: Variables<'a>,
}

#[derive(Serialize)]
struct Variables<'a> {
    login: &'a str,
}

#[derive(Deserialize)]
struct GraphQlResponse {
    data: Option<Data>,
    #[serde(default)]
    errors: Vec<GraphQlError>,
}

#[derive(Deserialize)]
struct GraphQlError {
    message: String,
}

#[derive(Deserialize)]
struct Data {
    user: Option<User>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct User {
    contributions_collection: ContributionsCollection,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ContributionsCollection {
    contribution_calendar: Calendar,
}

#[derive(Deserialize)]
struct Calendar {
    weeks: Vec<Week>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct Week {
    contribution_days: Vec<Day>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct Day {
    contribution_count: u32,
}

/// Daily counts, oldest first, from a GraphQL response body.
pub fn contribution_counts(body: &str) -> Result<Vec<f64>> {
    let resp: GraphQlResponse = serde_json::from_str(body).map_err(unavailable)?;
    if let Some(first) = resp.errors.first() {
        return Err(Error::upstream(format!("github: {}", first.message)));
    }
    let user = resp
        .data
        .and_then(|d| d.user)
        .ok_or_else(|| Error::upstream("github: user not found"))?;
    Ok(user
        .contributions_collection
        .contribution_calendar
        .weeks
        .iter()
        .flat_map(|w| &w.contribution_days)
        .map(|d| f64::from(d.contribution_count))
        .collect())
}

/// A bare JSON array of finite numbers.
pub fn parse_number_array(body: &str) -> Result<Vec<f64>> {
    let values: Vec<f64> = serde_json::from_str(body).map_err(unavailable)?;
    if values.iter().any(|v| !v.is_finite()) {
        return Err(Error::upstream("series contains non-finite values"));
    }
    Ok(values)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn calendar_flattens_in_order() {
        let body = r#"{"data":{"user":{"contributionsCollection":{"contributionCalendar":{"weeks":[
            {"contributionDays":[{"contributionCount":0},{"contributionCount":3}]},
            {"contributionDays":[{"contributionCount":7}]}
        ]}}}}}"#;
        assert_eq!(contribution_counts(body).unwrap(), vec![0.0, 3.0, 7.0]);
    }

    #[test]
    fn graphql_errors_are_upstream_failures() {
        let body = r#"{"data":null,"errors":[{"message":"Bad credentials"}]}"#;
        match contribution_counts(body) {
            Err(Error::UpstreamUnavailable(msg)) => assert!(msg.contains("Bad credentials")),
            other => panic!("unexpected {other:?}"),
        }
        assert!(matches!(contribution_counts(r#"{"data":{"user":null}}"#), Err(Error::UpstreamUnavailable(_))));
        assert!(matches!(contribution_counts("<html>"), Err(Error::UpstreamUnavailable(_))));
    }

    #[test]
    fn number_array_parsing() {
        assert_eq!(parse_number_array("[1, 2.5, 0]").unwrap(), vec![1.0, 2.5, 0.0]);
        assert!(matches!(parse_number_array(r#"{"a":1}"#), Err(Error::UpstreamUnavailable(_))));
    }

    #[test]
    fn github_user_requires_token() {
        let args = Args::try_parse_from(["eqwave", "--github-user", "octocat", "--github-token", ""]).unwrap();
        assert!(matches!(UpstreamSource::from_args(&args), Err(Error::InvalidParameter { name: "github_token", .. })));
        let args = Args::try_parse_from(["eqwave", "--series-url", "http://localhost/s.json"]).unwrap();
        assert_eq!(
            UpstreamSource::from_args(&args).unwrap(),
            Some(UpstreamSource::JsonUrl("http://localhost/s.json".into()))
        );
    }

    #[tokio::test]
    async fn unreachable_host_is_upstream_unavailable() {
        let src = UpstreamSource::JsonUrl("http://127.0.0.1:9/series.json".into());
        assert!(matches!(src.fetch(Duration::from_secs(2)).await, Err(Error::UpstreamUnavailable(_))));
    }
}
