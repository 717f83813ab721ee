pub mod address;

use std::path::{Path, PathBuf};
use thiserror::Error;

pub const DEFAULT_APPLICATION: &str = "demo-app";
pub const DEFAULT_ENVIRONMENT: &str = "local";

#[derive(Debug, Error)]
pub enum ContextError {
    #[error("The {0} identifier must not be empty")]
    EmptyIdentifier(&'static str),

    #[error("Path not found: {}", .0.display())]
    PathNotFound(PathBuf),
}

/// Application, environment and (maybe) version for one invocation.
///
/// Built once from the command line and read-only afterwards. A workflow
/// that needs a version turns it into a [`Release`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedContext {
    application: String,
    environment: String,
    version: Option<String>,
    project_root: PathBuf,
}

impl ResolvedContext {
    /// Applies the defaults and validates identifiers. A blank version is
    /// treated as unset.
    pub fn resolve(
        application: Option<&str>,
        environment: Option<&str>,
        version: Option<&str>,
        project_root: &Path,
    ) -> Result<Self, ContextError> {
        let application = application.unwrap_or(DEFAULT_APPLICATION).trim();
        let environment = environment.unwrap_or(DEFAULT_ENVIRONMENT).trim();
        if application.is_empty() {
            return Err(ContextError::EmptyIdentifier("application"));
        }
        if environment.is_empty() {
            return Err(ContextError::EmptyIdentifier("environment"));
        }
        let version = version
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map(str::to_string);

        Ok(Self {
            application: application.to_string(),
            environment: environment.to_string(),
            version,
            project_root: project_root.to_path_buf(),
        })
    }

    pub fn application(&self) -> &str {
        &self.application
    }

    pub fn environment(&self) -> &str {
        &self.environment
    }

    pub fn version(&self) -> Option<&str> {
        self.version.as_deref()
    }

    pub fn project_root(&self) -> &Path {
        &self.project_root
    }

    /// A copy of this context with `version` set.
    pub fn with_version(&self, version: impl Into<String>) -> Self {
        Self {
            version: Some(version.into()),
            ..self.clone()
        }
    }

    pub fn release(&self, version: &str) -> Result<Release, ContextError> {
        let version = version.trim();
        if version.is_empty() {
            return Err(ContextError::EmptyIdentifier("version"));
        }
        Ok(Release {
            context: self.with_version(version),
            version: version.to_string(),
        })
    }

    /// Checked on every call: fails with `PathNotFound` if the directory is
    /// absent right now.
    pub fn infrastructure_path(&self) -> Result<PathBuf, ContextError> {
        address::require_directory(address::infrastructure_path(
            &self.project_root,
            &self.application,
            &self.environment,
        ))
    }

    pub fn build_context_path(&self) -> PathBuf {
        address::build_context_path(&self.project_root, &self.application)
    }

    pub fn build_descriptor_path(&self) -> PathBuf {
        address::build_descriptor_path(&self.project_root, &self.application)
    }
}

/// A context with a known, non-empty version.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Release {
    context: ResolvedContext,
    version: String,
}

impl Release {
    pub fn context(&self) -> &ResolvedContext {
        &self.context
    }

    pub fn application(&self) -> &str {
        self.context.application()
    }

    pub fn environment(&self) -> &str {
        self.context.environment()
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn namespace(&self) -> String {
        address::namespace(self.application(), &self.version)
    }

    pub fn image_reference(&self) -> String {
        address::image_reference(self.application(), &self.version)
    }

    pub fn infrastructure_path(&self) -> Result<PathBuf, ContextError> {
        self.context.infrastructure_path()
    }

    /// Named variables handed to the provisioner by both apply and destroy.
    pub fn provisioner_variables(&self) -> Vec<(&'static str, String)> {
        vec![
            ("environment", self.environment().to_string()),
            ("version", self.version.clone()),
            ("image", self.image_reference()),
        ]
    }
}
