use super::{WorkflowEngine, WorkflowError, WorkflowResult};
use crate::context::{Release, ResolvedContext};
use crate::executor::{Invocation, Tool, WorkdirGuard};
use crate::ui;
use tracing::{info, instrument};

/// Provisioner command lines. All of them run inside the infrastructure
/// directory.
mod terraform {
    use super::*;

    pub fn init() -> Invocation {
        Invocation::new(Tool::Terraform).args(["init", "-input=false"])
    }

    pub fn workspace_list() -> Invocation {
        Invocation::new(Tool::Terraform).args(["workspace", "list"])
    }

    pub fn workspace_select(name: &str) -> Invocation {
        Invocation::new(Tool::Terraform).args(["workspace", "select", name])
    }

    pub fn workspace_new(name: &str) -> Invocation {
        Invocation::new(Tool::Terraform).args(["workspace", "new", name])
    }

    fn with_variables(subcommand: &str, release: &Release) -> Invocation {
        let mut inv =
            Invocation::new(Tool::Terraform).args([subcommand, "-auto-approve", "-input=false"]);
        for (name, value) in release.provisioner_variables() {
            inv = inv.arg("-var").arg(format!("{}={}", name, value));
        }
        inv
    }

    pub fn apply(release: &Release) -> Invocation {
        with_variables("apply", release)
    }

    pub fn destroy(release: &Release) -> Invocation {
        with_variables("destroy", release)
    }
}

/// Workspace names from `workspace list` output, current-marker stripped,
/// in listing order.
pub fn parse_workspace_list<S: AsRef<str>>(lines: &[S]) -> Vec<String> {
    lines
        .iter()
        .map(|l| l.as_ref().trim().trim_start_matches('*').trim())
        .filter(|l| !l.is_empty())
        .map(str::to_string)
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MissingWorkspace {
    Create,
    Fail,
}

impl WorkflowEngine<'_> {
    /// `up`: apply the infrastructure for a version.
    #[instrument(name = "up", skip_all, fields(app = %ctx.application(), env = %ctx.environment()))]
    pub async fn provision(&mut self, ctx: &ResolvedContext) -> WorkflowResult<Release> {
        let release = self.require_release(ctx)?;
        // Checked before anything runs so a wrong app/env makes no calls
        let infra = release.infrastructure_path()?;
        info!(
            "Provisioning {} from {}",
            ui::format_highlight(release.version()),
            infra.display()
        );
        {
            // Every terraform step below runs in the infrastructure dir
            let _workdir = WorkdirGuard::enter(&infra)?;
            self.run_checked(&terraform::init()).await?;

            // One workspace per version
            self.select_workspace(release.version(), MissingWorkspace::Create)
                .await?;
            self.run_checked(&terraform::apply(&release)).await?;
        }
        println!(
            "{}",
            ui::format_success(&format!(
                "Version {} is up (namespace {}, image {})",
                release.version(),
                release.namespace(),
                release.image_reference()
            ))
        );
        Ok(release)
    }

    /// `down`: destroy the infrastructure of an existing version.
    #[instrument(name = "down", skip_all, fields(app = %ctx.application(), env = %ctx.environment()))]
    pub async fn teardown(&mut self, ctx: &ResolvedContext) -> WorkflowResult<Release> {
        let release = self.require_release(ctx)?;
        let infra = release.infrastructure_path()?;
        info!(
            "Tearing down {} from {}",
            ui::format_highlight(release.version()),
            infra.display()
        );
        {
            let _workdir = WorkdirGuard::enter(&infra)?;
            self.run_checked(&terraform::init()).await?;

            // Never create a workspace just to destroy it
            self.select_workspace(release.version(), MissingWorkspace::Fail)
                .await?;
            self.run_checked(&terraform::destroy(&release)).await?;
        }
        println!(
            "{}",
            ui::format_success(&format!("Version {} is down", release.version()))
        );
        Ok(release)
    }

    /// Must be called from inside the infrastructure directory.
    pub(super) async fn workspaces(&mut self) -> WorkflowResult<Vec<String>> {
        let result = self.capture_checked(&terraform::workspace_list()).await?;
        Ok(parse_workspace_list(&result.output.stdout_lines()?))
    }

    /// Only a workspace missing from the listing is created. A failure to
    /// select one that does exist is surfaced as is.
    async fn select_workspace(&mut self, name: &str, missing: MissingWorkspace) -> WorkflowResult<()> {
        let known = self.workspaces().await?;
        if known.iter().any(|w| w == name) {
            tracing::debug!("Selecting existing workspace {}", name);
            self.run_checked(&terraform::workspace_select(name)).await?;
            return Ok(());
        }
        match missing {
            MissingWorkspace::Create => {
                info!("Creating workspace {}", ui::format_highlight(name));
                self.run_checked(&terraform::workspace_new(name)).await?;
                Ok(())
            }
            MissingWorkspace::Fail => Err(WorkflowError::WorkspaceNotFound(name.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::ContextError;
    use crate::test_support::{probe_in, project_tree, MockExecutor, Mode, ScriptedPrompt};
    use serial_test::serial;
    use std::env;

    const APPLY_V1: &str = "terraform apply -auto-approve -input=false -var environment=local -var version=v1 -var image=demo-app:v1";
    const DESTROY_V1: &str = "terraform destroy -auto-approve -input=false -var environment=local -var version=v1 -var image=demo-app:v1";

    fn scripted_terraform(workspaces: &str) -> MockExecutor {
        let mut executor = MockExecutor::new();
        executor.add_success("terraform init -input=false", "");
        executor.add_success("terraform workspace list", workspaces);
        executor.add_success("terraform workspace select v1", "");
        executor.add_success("terraform workspace new v1", "");
        executor.add_success(APPLY_V1, "");
        executor.add_success(DESTROY_V1, "");
        executor
    }

    #[test]
    fn test_parse_workspace_list() {
        let lines = ["  default", "* v1", "  v2", ""];
        assert_eq!(parse_workspace_list(&lines), vec!["default", "v1", "v2"]);
    }

    #[tokio::test]
    #[serial]
    async fn test_provision_selects_existing_workspace() {
        let (temp_dir, ctx) = project_tree(Some("v1"));
        let start = env::current_dir().unwrap();
        let mut executor = scripted_terraform("* default\n  v1\n");
        let mut prompt = ScriptedPrompt::new();

        let release = WorkflowEngine::new(&mut executor, &mut prompt, probe_in(temp_dir.path()))
            .provision(&ctx)
            .await
            .unwrap();

        assert_eq!(release.namespace(), "demo-app-v1");
        assert_eq!(
            executor.commands(),
            vec![
                "terraform init -input=false",
                "terraform workspace list",
                "terraform workspace select v1",
                APPLY_V1,
            ]
        );
        let infra = temp_dir
            .path()
            .join("demo-app/infrastructure/local")
            .canonicalize()
            .unwrap();
        for call in executor.calls() {
            assert_eq!(call.cwd.canonicalize().unwrap(), infra);
        }
        assert_eq!(executor.calls()[1].mode, Mode::Capture);
        assert_eq!(executor.calls()[3].mode, Mode::Run);
        assert_eq!(env::current_dir().unwrap(), start);
        assert!(prompt.asked.is_empty());
    }

    #[tokio::test]
    #[serial]
    async fn test_provision_creates_missing_workspace() {
        let (temp_dir, ctx) = project_tree(Some("v1"));
        let mut executor = scripted_terraform("* default\n");
        let mut prompt = ScriptedPrompt::new();

        WorkflowEngine::new(&mut executor, &mut prompt, probe_in(temp_dir.path()))
            .provision(&ctx)
            .await
            .unwrap();

        assert!(executor.ran("terraform workspace new v1"));
        assert!(!executor.ran("terraform workspace select v1"));
        assert!(executor.ran(APPLY_V1));
    }

    #[tokio::test]
    #[serial]
    async fn test_provision_surfaces_select_failure_of_existing_workspace() {
        let (temp_dir, ctx) = project_tree(Some("v1"));
        let mut executor = scripted_terraform("  default\n  v1\n");
        executor.add_failure("terraform workspace select v1", 1);
        let mut prompt = ScriptedPrompt::new();

        let err = WorkflowEngine::new(&mut executor, &mut prompt, probe_in(temp_dir.path()))
            .provision(&ctx)
            .await
            .unwrap_err();

        assert!(matches!(err, WorkflowError::ExternalCommand { code: 1, .. }));
        assert!(!executor.ran("terraform workspace new v1"));
        assert!(!executor.ran(APPLY_V1));
    }

    #[tokio::test]
    #[serial]
    async fn test_provision_prompts_for_version() {
        let (temp_dir, ctx) = project_tree(None);
        let mut executor = scripted_terraform("  default\n  v1\n");
        let mut prompt = ScriptedPrompt::answering(" v1 ");

        let release = WorkflowEngine::new(&mut executor, &mut prompt, probe_in(temp_dir.path()))
            .provision(&ctx)
            .await
            .unwrap();

        assert_eq!(release.version(), "v1");
        assert_eq!(prompt.asked, vec!["Version"]);
    }

    #[tokio::test]
    #[serial]
    async fn test_provision_empty_prompt_is_fatal() {
        let (temp_dir, ctx) = project_tree(None);
        let mut executor = scripted_terraform("");
        let mut prompt = ScriptedPrompt::new();

        let err = WorkflowEngine::new(&mut executor, &mut prompt, probe_in(temp_dir.path()))
            .provision(&ctx)
            .await
            .unwrap_err();

        assert!(matches!(err, WorkflowError::UserInputRequired(_)));
        assert!(executor.commands().is_empty());
    }

    #[tokio::test]
    #[serial]
    async fn test_provision_missing_infrastructure_before_any_call() {
        let (temp_dir, ctx) = project_tree(Some("v1"));
        std::fs::remove_dir_all(temp_dir.path().join("demo-app/infrastructure")).unwrap();
        let mut executor = scripted_terraform("");
        let mut prompt = ScriptedPrompt::new();

        let err = WorkflowEngine::new(&mut executor, &mut prompt, probe_in(temp_dir.path()))
            .provision(&ctx)
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            WorkflowError::Context(ContextError::PathNotFound(_))
        ));
        assert!(executor.commands().is_empty());
    }

    #[tokio::test]
    #[serial]
    async fn test_failed_apply_restores_working_directory() {
        let (temp_dir, ctx) = project_tree(Some("v1"));
        let start = env::current_dir().unwrap();
        let mut executor = scripted_terraform("  default\n  v1\n");
        executor.add_failure(APPLY_V1, 1);
        let mut prompt = ScriptedPrompt::new();

        let err = WorkflowEngine::new(&mut executor, &mut prompt, probe_in(temp_dir.path()))
            .provision(&ctx)
            .await
            .unwrap_err();

        match err {
            WorkflowError::ExternalCommand { command, code } => {
                assert_eq!(command, APPLY_V1);
                assert_eq!(code, 1);
            }
            other => panic!("expected ExternalCommand, got {:?}", other),
        }
        assert_eq!(env::current_dir().unwrap(), start);
    }

    #[tokio::test]
    #[serial]
    async fn test_teardown_destroys_existing_workspace() {
        let (temp_dir, ctx) = project_tree(Some("v1"));
        let mut executor = scripted_terraform("  default\n* v1\n");
        let mut prompt = ScriptedPrompt::new();

        WorkflowEngine::new(&mut executor, &mut prompt, probe_in(temp_dir.path()))
            .teardown(&ctx)
            .await
            .unwrap();

        assert_eq!(
            executor.commands(),
            vec![
                "terraform init -input=false",
                "terraform workspace list",
                "terraform workspace select v1",
                DESTROY_V1,
            ]
        );
    }

    #[tokio::test]
    #[serial]
    async fn test_teardown_unknown_workspace_never_destroys() {
        let (temp_dir, ctx) = project_tree(Some("v1"));
        let start = env::current_dir().unwrap();
        let mut executor = scripted_terraform("* default\n  v2\n");
        let mut prompt = ScriptedPrompt::new();

        let err = WorkflowEngine::new(&mut executor, &mut prompt, probe_in(temp_dir.path()))
            .teardown(&ctx)
            .await
            .unwrap_err();

        assert!(matches!(err, WorkflowError::WorkspaceNotFound(ref w) if w == "v1"));
        assert!(!executor.ran(DESTROY_V1));
        assert!(!executor.ran("terraform workspace new v1"));
        assert_eq!(env::current_dir().unwrap(), start);
    }

    #[tokio::test]
    #[serial]
    async fn test_teardown_missing_infrastructure_before_any_call() {
        let (temp_dir, ctx) = project_tree(Some("v1"));
        std::fs::remove_dir_all(temp_dir.path().join("demo-app/infrastructure")).unwrap();
        let mut executor = scripted_terraform("  default\n  v1\n");
        let mut prompt = ScriptedPrompt::new();

        let err = WorkflowEngine::new(&mut executor, &mut prompt, probe_in(temp_dir.path()))
            .teardown(&ctx)
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            WorkflowError::Context(ContextError::PathNotFound(_))
        ));
        assert!(executor.commands().is_empty());
    }

    #[tokio::test]
    #[serial]
    async fn test_provision_file_in_place_of_infrastructure_dir() {
        let (temp_dir, ctx) = project_tree(Some("v1"));
        let infra = temp_dir.path().join("demo-app/infrastructure/local");
        std::fs::remove_dir_all(&infra).unwrap();
        std::fs::write(&infra, "").unwrap();
        let mut executor = scripted_terraform("");
        let mut prompt = ScriptedPrompt::new();

        let err = WorkflowEngine::new(&mut executor, &mut prompt, probe_in(temp_dir.path()))
            .provision(&ctx)
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            WorkflowError::Context(ContextError::PathNotFound(_))
        ));
        assert!(executor.commands().is_empty());
    }
}
