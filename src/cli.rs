use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::collector::{FormField, OrganizationForm};

#[derive(Parser, Debug)]
#[command(
    name = "landscape",
    version,
    about = "Competitive landscape reports for nonprofit organizations"
)]
pub struct Cli {
    #[arg(
        long,
        global = true,
        help = "Directory exported PDFs are saved to (overrides LANDSCAPE_OUTPUT_DIR)"
    )]
    pub output_dir: Option<PathBuf>,
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Fill in the form and browse the report in the terminal (default)
    Interactive,
    /// Build one report from flags and print it
    Report(ReportArgs),
    /// List the accepted focus areas and budget ranges
    Options,
}

#[derive(Args, Debug, Clone, Default)]
pub struct ReportArgs {
    #[arg(long)]
    pub name: String,
    #[arg(long, help = "Primary service zip code (5 digits)")]
    pub zip: String,
    #[arg(long, help = "Primary focus area, e.g. \"Mental Health\"")]
    pub focus_area: String,
    #[arg(long)]
    pub mission: String,
    #[arg(long)]
    pub target_population: String,
    #[arg(long, help = "Annual budget range, e.g. \"$100K - $500K\"")]
    pub budget: Option<String>,
    #[arg(long, default_value_t = false, help = "Print the report as JSON")]
    pub json: bool,
    #[arg(long, default_value_t = false, help = "Also save the report as a PDF")]
    pub export: bool,
}

impl ReportArgs {
    pub fn to_form(&self) -> OrganizationForm {
        let mut form = OrganizationForm::new();
        form.set(FormField::OrganizationName, self.name.as_str());
        form.set(FormField::ZipCode, self.zip.as_str());
        form.set(FormField::FocusArea, self.focus_area.as_str());
        form.set(
            FormField::AnnualBudget,
            self.budget.as_deref().unwrap_or_default(),
        );
        form.set(FormField::Mission, self.mission.as_str());
        form.set(FormField::TargetPopulation, self.target_population.as_str());
        form
    }
}
