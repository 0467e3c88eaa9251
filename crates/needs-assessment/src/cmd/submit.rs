use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::Args;

use needs_lib::{HttpNeedsApi, NeedsAssessment, NeedsConfig, PendingFile, TracingHooks};
use needs_spec::{Advance, FlowKind, Questionnaire};

use super::answers::AnswersDocument;
use super::check::evaluate;
use super::{CatalogSource, FlowArg};

#[derive(Args, Debug, Clone)]
pub struct SubmitArgs {
    #[command(flatten)]
    pub source: CatalogSource,
    #[arg(long, value_name = "answers.json")]
    pub answers: PathBuf,
    #[arg(long, value_enum, default_value = "client")]
    pub flow: FlowArg,
    /// File to attach; repeat for several
    #[arg(long, value_name = "FILE")]
    pub attach: Vec<PathBuf>,
    /// Print the payload instead of sending it
    #[arg(long = "dry-run", default_value_t = false)]
    pub dry_run: bool,
}

pub async fn run(args: SubmitArgs, config: NeedsConfig) -> Result<()> {
    let answers = AnswersDocument::from_path(&args.answers)?;
    let flow = FlowKind::from(args.flow);

    if args.dry_run {
        return dry_run(&args, &config, &answers, flow).await;
    }

    let api = HttpNeedsApi::new(config.api.clone())?;
    let mut session = match &args.source.catalog {
        Some(path) => {
            let catalog = super::read_catalog(path)?;
            NeedsAssessment::with_catalog(api, TracingHooks, config, flow, catalog)
        }
        None => NeedsAssessment::load(api, TracingHooks, config, flow).await?,
    };

    answers.apply(session.questionnaire_mut());
    session.set_client(answers.client.clone());
    if let Advance::Blocked { category, missing } = session.advance_to_end() {
        bail!("step \"{category}\" is missing answers to questions {missing:?}");
    }

    if !args.attach.is_empty() {
        let mut files = Vec::with_capacity(args.attach.len());
        for path in &args.attach {
            let file = PendingFile::from_path(path)
                .await
                .with_context(|| format!("failed to read attachment {}", path.display()))?;
            files.push(file);
        }
        let report = session.upload(files).await?;
        for (name, err) in &report.failed {
            tracing::warn!(file = %name, error = %err, "attachment skipped");
        }
    }

    let id = session.submit().await?;
    println!("submitted needs assessment {id}");
    Ok(())
}

async fn dry_run(
    args: &SubmitArgs,
    config: &NeedsConfig,
    answers: &AnswersDocument,
    flow: FlowKind,
) -> Result<()> {
    if !args.attach.is_empty() {
        tracing::warn!(files = args.attach.len(), "dry run does not upload attachments");
    }
    let catalog = args.source.load(config).await?;
    let mut questionnaire = Questionnaire::new(catalog, config.questionnaire.clone());
    answers.apply(&mut questionnaire);
    if let Some(problem) = evaluate(&mut questionnaire, flow, answers) {
        bail!("answers are not ready to submit: {problem}");
    }
    let payload = questionnaire.assemble(flow, &answers.client, &[])?;
    println!("{}", serde_json::to_string_pretty(&payload)?);
    Ok(())
}
