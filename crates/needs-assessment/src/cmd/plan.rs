use anyhow::Result;
use clap::Args;
use serde::Serialize;

use needs_lib::NeedsConfig;
use needs_spec::{Questionnaire, StepGroup, StepKind};

use super::CatalogSource;

#[derive(Args, Debug, Clone)]
pub struct PlanArgs {
    #[command(flatten)]
    pub source: CatalogSource,
    /// Category to select; repeat for several
    #[arg(long, value_name = "CATEGORY")]
    pub select: Vec<String>,
    #[arg(long = "json", default_value_t = false)]
    pub json: bool,
}

#[derive(Debug, Serialize)]
struct PlanOutput<'a> {
    optional_categories: Vec<String>,
    steps: &'a [StepGroup],
}

pub async fn run(args: PlanArgs, config: &NeedsConfig) -> Result<()> {
    let catalog = args.source.load(config).await?;
    let mut questionnaire = Questionnaire::new(catalog, config.questionnaire.clone());
    for category in &args.select {
        questionnaire.toggle_category(category, true);
    }

    if args.json {
        let output = PlanOutput {
            optional_categories: questionnaire.optional_categories(),
            steps: questionnaire.plan().groups(),
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    for (index, group) in questionnaire.plan().groups().iter().enumerate() {
        println!(
            "{:>2}. {} [{}] ({} questions)",
            index + 1,
            group.category,
            kind_label(&group.kind),
            group.questions.len()
        );
    }
    let optional = questionnaire.optional_categories();
    if !optional.is_empty() {
        println!();
        println!("selectable: {}", optional.join(", "));
    }
    Ok(())
}

fn kind_label(kind: &StepKind) -> String {
    match kind {
        StepKind::Mandatory => "mandatory".into(),
        StepKind::Optional => "optional".into(),
        StepKind::Equipment => "equipment".into(),
        StepKind::Accessory { base } => format!("accessory of {base}"),
    }
}
