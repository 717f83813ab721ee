use super::error::CliError;
use crate::context::ResolvedContext;
use crate::ui;
use crate::workflow::{VersionStatus, WorkflowEngine};
use clap::Args;
use colored::Colorize;
use tabled::{
    settings::{object::Rows, Color, Modify, Style},
    Table, Tabled,
};

#[derive(Debug, Args)]
pub struct Versions {}

#[derive(Tabled)]
struct VersionRow {
    #[tabled(rename = "VERSION")]
    version: String,
    #[tabled(rename = "STATUS")]
    status: String,
    #[tabled(rename = "URL")]
    url: String,
}

fn status_label(deployed: bool) -> &'static str {
    if deployed {
        "deployed"
    } else {
        "not deployed"
    }
}

impl From<&VersionStatus> for VersionRow {
    fn from(status: &VersionStatus) -> Self {
        Self {
            version: status.version.clone(),
            status: status_label(status.state.is_deployed).to_string(),
            url: status
                .state
                .forwarded_url
                .as_ref()
                .map(|u| u.to_string())
                .unwrap_or_default(),
        }
    }
}

pub fn render_table(statuses: &[VersionStatus]) -> String {
    let rows: Vec<VersionRow> = statuses.iter().map(VersionRow::from).collect();
    let mut table = Table::new(rows);
    table
        .with(Style::blank())
        .with(Modify::new(Rows::first()).with(Color::FG_CYAN))
        .with(
            Modify::new(Rows::first())
                .with(tabled::settings::Format::content(|s| s.bold().to_string())),
        );
    table.to_string()
}

impl Versions {
    pub async fn run(
        &self,
        engine: &mut WorkflowEngine<'_>,
        ctx: &ResolvedContext,
    ) -> Result<(), CliError> {
        let pb = ui::create_spinner(&format!(
            "Probing versions of {}...",
            ui::format_highlight(ctx.application())
        ));
        let result = engine.list_versions(ctx).await;
        pb.finish_and_clear();
        let statuses = result?;

        if statuses.is_empty() {
            println!(
                "{}",
                ui::format_warning(&format!(
                    "No versions of {} provisioned in {}",
                    ctx.application(),
                    ctx.environment()
                ))
            );
        } else {
            println!("{}", render_table(&statuses));
        }
        Ok(())
    }
}
