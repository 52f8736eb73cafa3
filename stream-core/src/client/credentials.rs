//! Static credentials for request signing.
//!
//! Resolution order: the `AWS_*` environment variables, then the named
//! profile (`AWS_PROFILE`, default `default`) in the shared credentials file
//! and then the shared config file.

use crate::error::StartupError;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

pub const ACCESS_KEY_ENV: &str = "AWS_ACCESS_KEY_ID";
pub const SECRET_KEY_ENV: &str = "AWS_SECRET_ACCESS_KEY";
pub const SESSION_TOKEN_ENV: &str = "AWS_SESSION_TOKEN";
pub const PROFILE_ENV: &str = "AWS_PROFILE";
pub const CREDENTIALS_FILE_ENV: &str = "AWS_SHARED_CREDENTIALS_FILE";
pub const CONFIG_FILE_ENV: &str = "AWS_CONFIG_FILE";

const DEFAULT_PROFILE: &str = "default";
const ACCESS_KEY_PROPERTY: &str = "aws_access_key_id";
const SECRET_KEY_PROPERTY: &str = "aws_secret_access_key";
const SESSION_TOKEN_PROPERTY: &str = "aws_session_token";

/// Static credentials used to sign requests.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    access_key_id: String,
    secret_access_key: String,
    session_token: Option<String>,
}

impl Credentials {
    pub fn new(
        access_key_id: impl Into<String>,
        secret_access_key: impl Into<String>,
        session_token: Option<String>,
    ) -> Self {
        Self {
            access_key_id: access_key_id.into(),
            secret_access_key: secret_access_key.into(),
            session_token,
        }
    }

    /// Resolves credentials from the process environment and the shared
    /// AWS profile files.
    pub fn resolve() -> Result<Self, StartupError> {
        Self::resolve_with(
            |key| std::env::var(key).ok(),
            |path| std::fs::read_to_string(path).ok(),
        )
    }

    /// Resolves credentials through `lookup` for variables and `read_file`
    /// for the profile files. Unreadable files count as absent.
    pub fn resolve_with<F, R>(lookup: F, read_file: R) -> Result<Self, StartupError>
    where
        F: Fn(&str) -> Option<String>,
        R: Fn(&Path) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if get(ACCESS_KEY_ENV).is_some() {
            return Self::from_lookup(&lookup);
        }

        let profile = get(PROFILE_ENV).unwrap_or_else(|| DEFAULT_PROFILE.to_string());
        let files = profile_files(&get);
        for (path, section) in &files {
            let Some(contents) = read_file(path) else {
                continue;
            };
            let sections = parse_profile_file(&contents);
            let Some(properties) = sections.get(&section_name(section, &profile)) else {
                continue;
            };
            let property = |key: &str| properties.get(key).filter(|v| !v.is_empty()).cloned();
            match (property(ACCESS_KEY_PROPERTY), property(SECRET_KEY_PROPERTY)) {
                (Some(access_key_id), Some(secret_access_key)) => {
                    log::debug!("Using credentials from profile {} in {}", profile, path.display());
                    return Ok(Self::new(
                        access_key_id,
                        secret_access_key,
                        property(SESSION_TOKEN_PROPERTY),
                    ));
                }
                (Some(_), None) => {
                    return Err(StartupError::MissingCredentials(format!(
                        "profile {} in {} has no {}",
                        profile,
                        path.display(),
                        SECRET_KEY_PROPERTY
                    )));
                }
                _ => continue,
            }
        }

        let searched: Vec<String> = files.iter().map(|(p, _)| p.display().to_string()).collect();
        Err(StartupError::MissingCredentials(format!(
            "{} is not set and profile {} was not found in [{}]",
            ACCESS_KEY_ENV,
            profile,
            searched.join(", ")
        )))
    }

    /// Reads credentials through `lookup`, treating empty values as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, StartupError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &'static str| {
            lookup(key)
                .filter(|v| !v.is_empty())
                .ok_or_else(|| StartupError::MissingCredentials(format!("{} is not set", key)))
        };
        let access_key_id = get(ACCESS_KEY_ENV)?;
        let secret_access_key = get(SECRET_KEY_ENV)?;
        Ok(Self::new(access_key_id, secret_access_key, get(SESSION_TOKEN_ENV).ok()))
    }

    pub fn get_access_key_id(&self) -> &str {
        &self.access_key_id
    }

    pub fn get_secret_access_key(&self) -> &str {
        &self.secret_access_key
    }

    pub fn get_session_token(&self) -> Option<&str> {
        self.session_token.as_deref()
    }
}

/// Which kind of file a profile is read from; the config file prefixes
/// non-default sections with `profile `.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum ProfileSection {
    Credentials,
    Config,
}

fn section_name(kind: &ProfileSection, profile: &str) -> String {
    match kind {
        ProfileSection::Config if profile != DEFAULT_PROFILE => format!("profile {}", profile),
        _ => profile.to_string(),
    }
}

/// Credentials file first, then config file.
fn profile_files<G>(get: &G) -> Vec<(PathBuf, ProfileSection)>
where
    G: Fn(&str) -> Option<String>,
{
    let home = get("HOME").or_else(|| get("USERPROFILE")).map(PathBuf::from);
    let path_for = |env: &str, default: &str| {
        get(env)
            .map(PathBuf::from)
            .or_else(|| home.as_ref().map(|h| h.join(".aws").join(default)))
    };

    let mut files = Vec::new();
    if let Some(path) = path_for(CREDENTIALS_FILE_ENV, "credentials") {
        files.push((path, ProfileSection::Credentials));
    }
    if let Some(path) = path_for(CONFIG_FILE_ENV, "config") {
        files.push((path, ProfileSection::Config));
    }
    files
}

/// Parses an INI-style profile file into section -> key -> value.
///
/// Keys are lowercased, `#`/`;` lines are comments and properties before the
/// first section header are ignored.
fn parse_profile_file(contents: &str) -> HashMap<String, HashMap<String, String>> {
    let mut sections: HashMap<String, HashMap<String, String>> = HashMap::new();
    let mut current: Option<String> = None;

    for line in contents.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') || line.starts_with(';') {
            continue;
        }
        if let Some(header) = line.strip_prefix('[').and_then(|l| l.strip_suffix(']')) {
            let name = header.split_whitespace().collect::<Vec<_>>().join(" ");
            sections.entry(name.clone()).or_default();
            current = Some(name);
            continue;
        }
        let (Some(section), Some((key, value))) = (current.as_ref(), line.split_once('=')) else {
            continue;
        };
        if let Some(properties) = sections.get_mut(section) {
            properties.insert(key.trim().to_ascii_lowercase(), value.trim().to_string());
        }
    }
    sections
}

// Keep secrets out of logs.
impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("access_key_id", &self.access_key_id)
            .field("secret_access_key", &"***")
            .field("session_token", &self.session_token.as_ref().map(|_| "***"))
            .finish()
    }
}
