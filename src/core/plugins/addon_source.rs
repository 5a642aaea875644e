// Where a plugin archive can be downloaded from.
//
// Sources are either a git repository on a known host (GitHub or GitLab), a
// zip file at an arbitrary URL, or a plugin that already sits in a local
// plugin directory. Repository sources are turned into the host's archive API
// URL, optionally pinned to a branch, tag or commit.

use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AddonSourceError {
    #[error("`{0}` is not a valid host. Use github or gitlab.")]
    InvalidHost(String),

    #[error("`{0}` is not a valid zip url")]
    InvalidZipUrl(String),

    #[error("`{0}` is not a valid repository, expected user/repo")]
    InvalidRepo(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceType {
    Zip,
    Repo,
    Local,
}

impl fmt::Display for SourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SourceType::Zip => "zip",
            SourceType::Repo => "repo",
            SourceType::Local => "local",
        })
    }
}

/// A git host with an archive API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GitHost {
    #[default]
    Github,
    Gitlab,
}

impl GitHost {
    pub fn as_str(self) -> &'static str {
        match self {
            GitHost::Github => "github",
            GitHost::Gitlab => "gitlab",
        }
    }

    /// Headers the host's API expects.
    #[allow(dead_code)] // Will be used by the plugin installer once downloads are implemented
    pub fn headers(self) -> &'static [(&'static str, &'static str)] {
        match self {
            GitHost::Github => &[("Accept", "application/vnd.github.v3+json")],
            GitHost::Gitlab => &[],
        }
    }

    pub fn base_api_url(self) -> &'static str {
        match self {
            GitHost::Github => "https://api.github.com",
            GitHost::Gitlab => "https://gitlab.com/api/v4",
        }
    }

    pub fn repo_api_url(self, user: &str, repo: &str) -> String {
        match self {
            GitHost::Github => format!("{}/repos/{}/{}", self.base_api_url(), user, repo),
            GitHost::Gitlab => format!("{}/projects/{}%2F{}", self.base_api_url(), user, repo),
        }
    }

    /// Archive download URL, pinned to `reflike` when one is given.
    pub fn zip_archive_url(self, user: &str, repo: &str, reflike: Option<&str>) -> String {
        let repo_url = self.repo_api_url(user, repo);
        match (self, reflike) {
            (GitHost::Github, None) => format!("{}/zipball", repo_url),
            (GitHost::Github, Some(reflike)) => format!("{}/zipball/{}", repo_url, reflike),
            (GitHost::Gitlab, None) => format!("{}/repository/archive.zip", repo_url),
            (GitHost::Gitlab, Some(reflike)) => {
                format!("{}/repository/archive.zip?sha={}", repo_url, reflike)
            }
        }
    }
}

impl fmt::Display for GitHost {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GitHost {
    type Err = AddonSourceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "github" => Ok(GitHost::Github),
            "gitlab" => Ok(GitHost::Gitlab),
            _ => Err(AddonSourceError::InvalidHost(s.to_string())),
        }
    }
}

/// Repository details for sources built with [`AddonSource::from_repo`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoSource {
    pub user: String,
    pub repo: String,
    pub reflike: Option<String>,
    pub host: GitHost,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddonSource {
    /// Archive URL without its scheme. `None` for local sources.
    pub zip_url: Option<String>,
    pub domain: Option<String>,
    pub path: Option<String>,
    pub source_type: SourceType,
    pub repo: Option<RepoSource>,
}

impl AddonSource {
    pub fn from_repo(
        user: &str,
        repo: &str,
        reflike: Option<&str>,
        host: GitHost,
    ) -> Result<Self, AddonSourceError> {
        for part in [user, repo] {
            if !is_repo_component(part) {
                return Err(AddonSourceError::InvalidRepo(format!("{}/{}", user, repo)));
            }
        }
        let reflike = reflike.map(str::trim).filter(|r| !r.is_empty());

        let url = host.zip_archive_url(user, repo, reflike);
        let (zip_url, domain, path) =
            split_url(&url).ok_or_else(|| AddonSourceError::InvalidZipUrl(url.clone()))?;

        Ok(Self {
            zip_url: Some(zip_url),
            domain: Some(domain),
            path: Some(path),
            source_type: SourceType::Repo,
            repo: Some(RepoSource {
                user: user.to_string(),
                repo: repo.to_string(),
                reflike: reflike.map(str::to_string),
                host,
            }),
        })
    }

    /// A source pointing at a `.zip` file on any host.
    pub fn from_zip(url: &str) -> Result<Self, AddonSourceError> {
        let invalid = || AddonSourceError::InvalidZipUrl(url.to_string());

        let (zip_url, domain, path) = split_url(url.trim()).ok_or_else(invalid)?;
        if !path.ends_with(".zip") || path.len() == ".zip".len() {
            return Err(invalid());
        }

        Ok(Self {
            zip_url: Some(zip_url),
            domain: Some(domain),
            path: Some(path),
            source_type: SourceType::Zip,
            repo: None,
        })
    }

    #[allow(dead_code)] // Will be used by the plugin installer for plugins already on disk
    pub fn local() -> Self {
        Self {
            zip_url: None,
            domain: None,
            path: None,
            source_type: SourceType::Local,
            repo: None,
        }
    }

    /// Parse user input: a zip URL, `user/repo`, `gitlab:user/repo`, with an
    /// optional `@ref` on repositories.
    pub fn parse(input: &str) -> Result<Self, AddonSourceError> {
        let input = input.trim();
        if input.contains("://") || input.ends_with(".zip") {
            return Self::from_zip(input);
        }

        let (host, rest) = match input.split_once(':') {
            Some((host, rest)) => (host.parse::<GitHost>()?, rest),
            None => (GitHost::default(), input),
        };
        let (repo_path, reflike) = match rest.split_once('@') {
            Some((repo_path, reflike)) => (repo_path, Some(reflike)),
            None => (rest, None),
        };
        let (user, repo) = repo_path
            .split_once('/')
            .ok_or_else(|| AddonSourceError::InvalidRepo(repo_path.to_string()))?;

        Self::from_repo(user, repo, reflike, host)
    }

    /// URL to download the archive from. Always HTTPS.
    pub fn download_url(&self) -> Option<String> {
        self.zip_url.as_ref().map(|url| format!("https://{}", url))
    }
}

fn is_repo_component(part: &str) -> bool {
    !part.is_empty()
        && part != "."
        && part != ".."
        && part
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
}

/// Split a URL into (url without scheme, domain, path). The domain must
/// contain a dot and be followed by a path.
fn split_url(url: &str) -> Option<(String, String, String)> {
    let without_scheme = url
        .strip_prefix("https://")
        .or_else(|| url.strip_prefix("http://"))
        .unwrap_or(url);
    let (domain, path) = without_scheme.split_once('/')?;

    let labels_ok = domain.split('.').all(|label| !label.is_empty());
    if !domain.contains('.') || !labels_ok || domain.contains(char::is_whitespace) {
        return None;
    }

    Some((
        without_scheme.to_string(),
        domain.to_string(),
        path.to_string(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn github_repo_without_ref() {
        let source = AddonSource::from_repo("discord-modmail", "addons", None, GitHost::Github)
            .unwrap();

        assert_eq!(source.source_type, SourceType::Repo);
        assert_eq!(
            source.zip_url.as_deref(),
            Some("api.github.com/repos/discord-modmail/addons/zipball")
        );
        assert_eq!(source.domain.as_deref(), Some("api.github.com"));
        assert_eq!(
            source.path.as_deref(),
            Some("repos/discord-modmail/addons/zipball")
        );
        assert_eq!(source.repo.unwrap().reflike, None);
    }

    #[test]
    fn github_repo_with_ref() {
        let source =
            AddonSource::from_repo("discord-modmail", "addons", Some("v1.1"), GitHost::Github)
                .unwrap();

        assert_eq!(
            source.download_url().as_deref(),
            Some("https://api.github.com/repos/discord-modmail/addons/zipball/v1.1")
        );
        let repo = source.repo.unwrap();
        assert_eq!(repo.reflike.as_deref(), Some("v1.1"));
        assert_eq!(repo.host, GitHost::Github);
    }

    #[test]
    fn gitlab_repo_urls() {
        let plain = AddonSource::from_repo("onerandomusername", "addons", None, GitHost::Gitlab)
            .unwrap();
        assert_eq!(
            plain.zip_url.as_deref(),
            Some("gitlab.com/api/v4/projects/onerandomusername%2Faddons/repository/archive.zip")
        );
        assert_eq!(plain.domain.as_deref(), Some("gitlab.com"));

        let pinned =
            AddonSource::from_repo("onerandomusername", "addons", Some("main"), GitHost::Gitlab)
                .unwrap();
        assert!(pinned
            .zip_url
            .unwrap()
            .ends_with("repository/archive.zip?sha=main"));
    }

    #[test]
    fn host_names_parse_case_insensitively() {
        assert_eq!("GitHub".parse::<GitHost>().unwrap(), GitHost::Github);
        assert_eq!("gitlab".parse::<GitHost>().unwrap(), GitHost::Gitlab);
        assert_eq!(
            "bitbucket".parse::<GitHost>(),
            Err(AddonSourceError::InvalidHost("bitbucket".to_string()))
        );
    }

    #[test]
    fn github_api_wants_v3_json() {
        assert_eq!(
            GitHost::Github.headers(),
            &[("Accept", "application/vnd.github.v3+json")]
        );
        assert!(GitHost::Gitlab.headers().is_empty());
    }

    #[test]
    fn zip_source_strips_scheme_and_splits_url() {
        let source = AddonSource::from_zip("https://example.com/plugins/planet.zip").unwrap();

        assert_eq!(source.source_type, SourceType::Zip);
        assert_eq!(source.zip_url.as_deref(), Some("example.com/plugins/planet.zip"));
        assert_eq!(source.domain.as_deref(), Some("example.com"));
        assert_eq!(source.path.as_deref(), Some("plugins/planet.zip"));
        assert!(source.repo.is_none());

        let bare = AddonSource::from_zip("example.com/planet.zip").unwrap();
        assert_eq!(bare.zip_url.as_deref(), Some("example.com/planet.zip"));
    }

    #[test]
    fn invalid_zip_urls_are_rejected() {
        for url in [
            "https://example.com/planet.tar.gz",
            "https://localhost/planet.zip",
            "planet.zip",
            "https://example.com/.zip",
        ] {
            assert_eq!(
                AddonSource::from_zip(url),
                Err(AddonSourceError::InvalidZipUrl(url.to_string())),
                "{url}"
            );
        }
    }

    #[test]
    fn invalid_repo_components_are_rejected() {
        for (user, repo) in [("", "addons"), ("user", ".."), ("us er", "addons")] {
            assert!(matches!(
                AddonSource::from_repo(user, repo, None, GitHost::Github),
                Err(AddonSourceError::InvalidRepo(_))
            ));
        }
    }

    #[test]
    fn parses_user_input() {
        let github = AddonSource::parse("discord-modmail/addons@v1.1").unwrap();
        assert_eq!(github.repo.as_ref().unwrap().host, GitHost::Github);
        assert_eq!(github.repo.unwrap().reflike.as_deref(), Some("v1.1"));

        let gitlab = AddonSource::parse("gitlab:onerandomusername/addons").unwrap();
        assert_eq!(gitlab.domain.as_deref(), Some("gitlab.com"));

        let zip = AddonSource::parse("https://example.com/planet.zip").unwrap();
        assert_eq!(zip.source_type, SourceType::Zip);

        assert!(matches!(
            AddonSource::parse("sourceforge:user/repo"),
            Err(AddonSourceError::InvalidHost(_))
        ));
        assert!(matches!(
            AddonSource::parse("just-a-name"),
            Err(AddonSourceError::InvalidRepo(_))
        ));
    }

    #[test]
    fn local_source_has_no_url() {
        let source = AddonSource::local();

        assert_eq!(source.source_type, SourceType::Local);
        assert!(source.download_url().is_none());
    }
}
