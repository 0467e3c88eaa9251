use std::path::PathBuf;

use anyhow::{Result, bail};
use clap::Args;
use serde::Serialize;

use needs_lib::NeedsConfig;
use needs_spec::{Advance, FlowKind, ProgressSummary, QuestionId, Questionnaire};

use super::answers::AnswersDocument;
use super::{CatalogSource, FlowArg};

#[derive(Args, Debug, Clone)]
pub struct CheckArgs {
    #[command(flatten)]
    pub source: CatalogSource,
    #[arg(long, value_name = "answers.json")]
    pub answers: PathBuf,
    #[arg(long, value_enum, default_value = "client")]
    pub flow: FlowArg,
    #[arg(long = "json", default_value_t = false)]
    pub json: bool,
}

#[derive(Debug, Serialize)]
struct CheckReport {
    progress: ProgressSummary,
    ignored: Vec<QuestionId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    problem: Option<String>,
}

pub async fn run(args: CheckArgs, config: &NeedsConfig) -> Result<()> {
    let catalog = args.source.load(config).await?;
    let answers = AnswersDocument::from_path(&args.answers)?;
    let mut questionnaire = Questionnaire::new(catalog, config.questionnaire.clone());
    let ignored = answers.apply(&mut questionnaire);

    let problem = evaluate(&mut questionnaire, args.flow.into(), &answers);
    let report = CheckReport {
        progress: questionnaire.progress(),
        ignored,
        problem,
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        let progress = report.progress;
        println!(
            "step {}/{}, answered {}/{}",
            progress.step + 1,
            progress.steps,
            progress.answered,
            progress.total
        );
        if !report.ignored.is_empty() {
            println!("ignored responses: {:?}", report.ignored);
        }
    }

    match report.problem {
        Some(problem) => bail!("answers are not ready to submit: {problem}"),
        None => {
            if !args.json {
                println!("ready to submit");
            }
            Ok(())
        }
    }
}

/// Walks to the last step and assembles; returns the first problem found.
pub(crate) fn evaluate(
    questionnaire: &mut Questionnaire,
    flow: FlowKind,
    answers: &AnswersDocument,
) -> Option<String> {
    if let Advance::Blocked { category, missing } = questionnaire.advance_to_end() {
        return Some(format!(
            "step \"{category}\" is missing answers to questions {missing:?}"
        ));
    }
    questionnaire
        .assemble(flow, &answers.client, &[])
        .err()
        .map(|issue| issue.to_string())
}
