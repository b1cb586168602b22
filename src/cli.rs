use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

#[derive(Parser, Debug)]
#[command(
    name = "clinsort",
    version,
    about = "Sort rendered clinical document pages into categories by OCR heuristics"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    Classify(ClassifyArgs),
    Detect(DetectArgs),
    Inventory(InventoryArgs),
}

#[derive(Args, Debug, Clone)]
pub struct ClassifyArgs {
    #[arg(long)]
    pub input_dir: PathBuf,

    #[arg(long)]
    pub output_dir: PathBuf,

    #[arg(long, value_enum, default_value_t = ClassifyMode::Auto)]
    pub mode: ClassifyMode,

    #[arg(long, default_value = "eng")]
    pub ocr_lang: String,

    #[arg(long, default_value = "tesseract")]
    pub tesseract_bin: PathBuf,

    #[arg(long, default_value_t = 9.0)]
    pub noise_threshold: f64,

    #[arg(long)]
    pub manifest_path: Option<PathBuf>,

    #[arg(long, default_value_t = false)]
    pub debug: bool,
}

#[derive(Args, Debug, Clone)]
pub struct DetectArgs {
    #[arg(long)]
    pub input_dir: PathBuf,

    #[arg(long, default_value_t = 9.0)]
    pub noise_threshold: f64,
}

#[derive(Args, Debug, Clone)]
pub struct InventoryArgs {
    #[arg(long)]
    pub input_dir: PathBuf,

    #[arg(long)]
    pub manifest_path: Option<PathBuf>,

    #[arg(long, default_value_t = false)]
    pub dry_run: bool,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
pub enum ClassifyMode {
    Auto,
    Structured,
    Unstructured,
}

impl ClassifyMode {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Auto => "auto",
            Self::Structured => "structured",
            Self::Unstructured => "unstructured",
        }
    }
}
