use super::{WorkflowEngine, WorkflowError, WorkflowResult, REVISION_LENGTH};
use crate::context::{address, Release, ResolvedContext};
use crate::executor::{Invocation, Tool};
use crate::ui;
use tracing::{info, instrument};

#[derive(Debug, Clone, Default)]
pub struct BuildOptions {
    /// Explicit image tag; falls back to the context version, then to the
    /// abbreviated source revision.
    pub tag: Option<String>,
    /// Provision the freshly built version afterwards.
    pub deploy: bool,
}

fn revision_lookup(ctx: &ResolvedContext) -> Invocation {
    let mut inv = Invocation::new(Tool::Git);
    let root = ctx.project_root();
    if !root.as_os_str().is_empty() {
        inv = inv.arg("-C").arg(root.to_string_lossy());
    }
    inv.args([
        "rev-parse".to_string(),
        format!("--short={}", REVISION_LENGTH),
        "HEAD".to_string(),
    ])
}

fn docker_build(release: &Release, descriptor: &str, context_dir: &str) -> Invocation {
    Invocation::new(Tool::Docker).args([
        "build",
        "-t",
        release.image_reference().as_str(),
        "-f",
        descriptor,
        context_dir,
    ])
}

impl WorkflowEngine<'_> {
    #[instrument(name = "build", skip_all, fields(app = %ctx.application(), deploy = options.deploy))]
    pub async fn build(
        &mut self,
        ctx: &ResolvedContext,
        options: &BuildOptions,
    ) -> WorkflowResult<Release> {
        let context_dir = address::require_directory(ctx.build_context_path())?;
        let descriptor = address::require_existing(ctx.build_descriptor_path())?;

        // Blank tags count as unset
        let explicit = options
            .tag
            .as_deref()
            .or(ctx.version())
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(str::to_string);
        let tag = match explicit {
            Some(tag) => tag,
            None => self.current_revision(ctx).await?,
        };

        // Deploy must see the same version the image was tagged with
        let tagged = ctx.with_version(tag.as_str());
        let release = tagged.release(&tag)?;
        info!(
            "Building {}",
            ui::format_highlight(&release.image_reference())
        );
        self.run_checked(&docker_build(
            &release,
            &descriptor.to_string_lossy(),
            &context_dir.to_string_lossy(),
        ))
        .await?;
        println!(
            "{}",
            ui::format_success(&format!("Built {}", release.image_reference()))
        );

        if options.deploy {
            return self.provision(&tagged).await;
        }
        Ok(release)
    }

    async fn current_revision(&mut self, ctx: &ResolvedContext) -> WorkflowResult<String> {
        let inv = revision_lookup(ctx);
        let result = self
            .executor
            .capture(&inv)
            .await
            .map_err(|e| WorkflowError::RevisionUnavailable(e.to_string()))?;
        if !result.is_success() {
            let stderr = result.output.to_stderr_string().unwrap_or_default();
            return Err(WorkflowError::RevisionUnavailable(format!(
                "'{}' exited with {}: {}",
                inv,
                result.exit_code(),
                stderr.trim()
            )));
        }
        let revision = result
            .output
            .to_stdout_string()
            .map_err(|e| WorkflowError::RevisionUnavailable(e.to_string()))?
            .trim()
            .to_string();
        if revision.is_empty() {
            return Err(WorkflowError::RevisionUnavailable(format!(
                "'{}' printed nothing",
                inv
            )));
        }
        tracing::debug!("Using revision {} as tag", revision);
        Ok(revision)
    }
}
