//! Session template commands for CLI.

use clap::Subcommand;
use studyroom_core::templates::find_template;
use studyroom_core::Config;

#[derive(Subcommand)]
pub enum TemplateAction {
    /// List configured templates
    List {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show one template
    Show {
        /// Template id
        id: String,
    },
}

pub fn run(action: TemplateAction) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;

    match action {
        TemplateAction::List { json } => {
            if json {
                println!("{}", serde_json::to_string_pretty(&config.templates)?);
                return Ok(());
            }
            if config.templates.is_empty() {
                println!("No templates configured.");
                return Ok(());
            }
            let default = config.session.default_template.as_deref();
            println!("{:<12} {:>6} {:>6}  SUBJECT", "ID", "FOCUS", "BREAK");
            for t in &config.templates {
                let marker = if Some(t.id.as_str()) == default { " *" } else { "" };
                println!(
                    "{:<12} {:>5}m {:>5}m  {}{marker}",
                    t.id, t.focus_min, t.break_min, t.subject
                );
            }
        }
        TemplateAction::Show { id } => {
            let template = find_template(&config.templates, &id)?;
            println!("{}", serde_json::to_string_pretty(template)?);
        }
    }
    Ok(())
}
