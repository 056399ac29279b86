//! Optional badge enrichment over the network.
//!
//! Probes the package index (melpa.org and its stable counterpart) and the
//! GitHub workflow listing, keyed by the repository path from the `URL` (or
//! `Homepage`) header. Every failure degrades to a stderr warning; the
//! document renders the same with or without these badges.

use serde::Deserialize;
use std::collections::HashMap;
use std::time::Duration;

#[derive(Deserialize)]
struct WorkflowList {
    workflows: Vec<Workflow>,
}

#[derive(Deserialize)]
struct Workflow {
    badge_url: String,
    state: String,
}

pub struct BadgeProbe {
    agent: ureq::Agent,
}

impl BadgeProbe {
    pub fn new() -> Self {
        // The GitHub API rejects requests without a User-Agent.
        let agent = ureq::AgentBuilder::new()
            .timeout(Duration::from_secs(10))
            .user_agent(concat!("el2md/", env!("CARGO_PKG_VERSION")))
            .build();
        BadgeProbe { agent }
    }

    /// Run all probes for one document. Returns badge Markdown snippets in
    /// a fixed order: package index, stable package index, CI.
    pub fn collect(&self, headers: &HashMap<String, String>) -> Vec<String> {
        let Some(url) = repo_url(headers) else {
            eprintln!("warning: no URL header, skipping badge lookup");
            return Vec::new();
        };
        let Some((owner, repo)) = repo_path(url) else {
            eprintln!("warning: badge lookup needs a github.com URL, got {url}");
            return Vec::new();
        };
        let pkg = package_name(&repo);

        let mut badges = Vec::new();
        if let Some(b) = self.package_badge("melpa.org", "MELPA", pkg) {
            badges.push(b);
        }
        if let Some(b) = self.package_badge("stable.melpa.org", "MELPA Stable", pkg) {
            badges.push(b);
        }
        if let Some(b) = self.workflow_badge(&owner, &repo) {
            badges.push(b);
        }
        badges
    }

    /// 2xx on the index's badge image means the package is published there.
    fn package_badge(&self, host: &str, label: &str, pkg: &str) -> Option<String> {
        let badge_url = format!("https://{host}/packages/{pkg}-badge.svg");
        match self.agent.get(&badge_url).call() {
            Ok(_) => Some(format!("[![{label}]({badge_url})](https://{host}/#/{pkg})")),
            Err(ureq::Error::Status(_, _)) => {
                eprintln!("warning: {pkg} is not published on {host}");
                None
            }
            Err(err) => {
                eprintln!("warning: {host} lookup failed: {err}");
                None
            }
        }
    }

    /// Badge of the first active workflow, linked to the actions page.
    fn workflow_badge(&self, owner: &str, repo: &str) -> Option<String> {
        let api = format!("https://api.github.com/repos/{owner}/{repo}/actions/workflows");
        let resp = match self.agent.get(&api).call() {
            Ok(resp) => resp,
            Err(ureq::Error::Status(code, _)) => {
                eprintln!("warning: workflow lookup for {owner}/{repo} returned {code}");
                return None;
            }
            Err(err) => {
                eprintln!("warning: workflow lookup for {owner}/{repo} failed: {err}");
                return None;
            }
        };
        let list: WorkflowList = match resp.into_json() {
            Ok(list) => list,
            Err(err) => {
                eprintln!("warning: unreadable workflow listing for {owner}/{repo}: {err}");
                return None;
            }
        };
        let workflow = list.workflows.into_iter().find(|w| w.state == "active")?;
        Some(format!(
            "[![CI]({})](https://github.com/{owner}/{repo}/actions)",
            workflow.badge_url
        ))
    }
}

impl Default for BadgeProbe {
    fn default() -> Self {
        BadgeProbe::new()
    }
}

/// The `URL` header, falling back to `Homepage`. Keys are matched
/// case-insensitively since files are loose about the capitalization.
fn repo_url(headers: &HashMap<String, String>) -> Option<&str> {
    for wanted in ["URL", "Homepage"] {
        let found = headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(wanted));
        if let Some((_, value)) = found {
            return Some(value.as_str());
        }
    }
    None
}

/// `https://github.com/<owner>/<repo>[...]` → `(owner, repo)`, tolerating a
/// scheme variant, `www.`, a `.git` suffix, and trailing path segments.
fn repo_path(url: &str) -> Option<(String, String)> {
    let rest = url
        .strip_prefix("https://")
        .or_else(|| url.strip_prefix("http://"))?;
    let rest = rest.strip_prefix("www.").unwrap_or(rest);
    let rest = rest.strip_prefix("github.com/")?;
    let mut segments = rest.split('/');
    let owner = segments.next().filter(|s| !s.is_empty())?;
    let repo = segments.next().filter(|s| !s.is_empty())?;
    let repo = repo.strip_suffix(".git").unwrap_or(repo);
    Some((owner.to_string(), repo.to_string()))
}

/// Package name as the index knows it: the repository tail without any
/// `.el` suffix.
fn package_name(repo: &str) -> &str {
    repo.strip_suffix(".el").unwrap_or(repo)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn workflow_listing_deserializes() {
        let json = r#"{
            "total_count": 2,
            "workflows": [
                {"name": "CI", "badge_url": "https://github.com/jane/widget/workflows/CI/badge.svg", "state": "active"},
                {"name": "old", "badge_url": "https://github.com/jane/widget/workflows/old/badge.svg", "state": "disabled_manually"}
            ]
        }"#;
        let list: WorkflowList = serde_json::from_str(json).unwrap();
        assert_eq!(list.workflows.len(), 2);
        assert_eq!(list.workflows[0].state, "active");
        assert!(list.workflows[1].state != "active");
    }

    #[test]
    fn plain_repo_url() {
        assert_eq!(
            repo_path("https://github.com/jane/widget.el"),
            Some(("jane".to_string(), "widget.el".to_string()))
        );
    }

    #[test]
    fn git_suffix_and_trailing_slash() {
        assert_eq!(
            repo_path("https://github.com/jane/widget.git"),
            Some(("jane".to_string(), "widget".to_string()))
        );
        assert_eq!(
            repo_path("https://github.com/jane/widget/"),
            Some(("jane".to_string(), "widget".to_string()))
        );
    }

    #[test]
    fn scheme_and_www_variants() {
        assert_eq!(
            repo_path("http://www.github.com/jane/widget"),
            Some(("jane".to_string(), "widget".to_string()))
        );
    }

    #[test]
    fn deep_paths_keep_owner_and_repo() {
        assert_eq!(
            repo_path("https://github.com/jane/widget/tree/main"),
            Some(("jane".to_string(), "widget".to_string()))
        );
    }

    #[test]
    fn non_github_hosts_rejected() {
        assert_eq!(repo_path("https://gitlab.com/jane/widget"), None);
        assert_eq!(repo_path("git@github.com:jane/widget.git"), None);
    }

    #[test]
    fn package_name_drops_el_suffix() {
        assert_eq!(package_name("widget.el"), "widget");
        assert_eq!(package_name("widget"), "widget");
    }

    #[test]
    fn url_header_preferred_over_homepage() {
        let mut headers = HashMap::new();
        headers.insert("Homepage".to_string(), "https://a".to_string());
        headers.insert("URL".to_string(), "https://b".to_string());
        assert_eq!(repo_url(&headers), Some("https://b"));
    }

    #[test]
    fn header_lookup_ignores_case() {
        let mut headers = HashMap::new();
        headers.insert("Url".to_string(), "https://b".to_string());
        assert_eq!(repo_url(&headers), Some("https://b"));
    }

    #[test]
    fn missing_url_header() {
        assert_eq!(repo_url(&HashMap::new()), None);
    }
}
