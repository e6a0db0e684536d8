use std::io::{self, BufRead, Write};
use std::process::ExitCode;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};

use labelpress::config::{paths::LabelPaths, settings::Settings};
use labelpress::engine::{FillEngine, FillOptions, InputSource, PrimaryData, Reporter};
use labelpress::models::LabelFile;
use labelpress::print::Printer;
use labelpress::storage::TemplateStore;

#[derive(Parser)]
#[command(
    name = "labelpress",
    version,
    about = "Terminal label template manager for EPL printers",
    long_about = "labelpress loads text label templates, fills their <...> tokens \
                  interactively or from a primary data table, and sends the rendered \
                  command stream to a label printer or the screen."
)]
struct Cli {
    /// Config file name inside the config directory
    #[arg(short, long, default_value = "labelpress.conf", env = "LABELPRESS_CONFIG")]
    config: String,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// List available label templates
    #[command(alias = "ls")]
    List,

    /// Show a template's source
    Show {
        /// Template name (exact or unique substring)
        name: String,
    },

    /// Fill a template and print it
    Print {
        /// Template name (exact or unique substring)
        name: Option<String>,
    },

    /// Show current configuration and paths
    Config,

    /// Show the primary data table
    Data,
}

fn main() -> ExitCode {
    match run() {
        Ok(code) => code,
        Err(err) => {
            eprintln!("Error: {:#}", err);
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<ExitCode> {
    let cli = Cli::parse();

    let paths = LabelPaths::new()?;
    paths.ensure_directories()?;
    let settings = Settings::load_or_create(&paths, &cli.config)?;

    match cli.command {
        Some(Commands::List) => {
            for file in load_templates(&settings, &paths)? {
                println!("{}", file);
            }
        }
        Some(Commands::Show { name }) => {
            let files = load_templates(&settings, &paths)?;
            let file = select_template(&files, &name)?;
            print!("{}", file.template);
        }
        Some(Commands::Print { name }) => {
            return print_command(&settings, &paths, Selection::from_name(name.as_deref()));
        }
        Some(Commands::Config) => {
            println!("labelpress configuration");
            println!("========================");
            println!("Config file:   {}", paths.config_file(&cli.config).display());
            println!("Templates:     {}", settings.templates_dir(&paths).display());
            println!();
            print!("{}", settings.to_content());
        }
        Some(Commands::Data) => {
            let primary = load_primary_data(&settings);
            for (key, value) in primary.iter() {
                println!("{}: {}", key, value);
            }
        }
        None => {
            if settings.print_one_file {
                return print_command(&settings, &paths, Selection::First);
            }
            for file in load_templates(&settings, &paths)? {
                println!("{}", file);
            }
            println!();
            println!("Run 'labelpress print <name>' to fill and print a template.");
        }
    }

    Ok(ExitCode::SUCCESS)
}

/// How the template to print is chosen
enum Selection<'a> {
    /// By name given on the command line
    Named(&'a str),
    /// The first loaded template, without asking (print-one-file mode)
    First,
    /// An interactive numbered picker
    Ask,
}

impl<'a> Selection<'a> {
    fn from_name(name: Option<&'a str>) -> Self {
        match name {
            Some(name) => Self::Named(name),
            None => Self::Ask,
        }
    }
}

/// Fill the selected template and send it to the configured printer
fn print_command(
    settings: &Settings,
    paths: &LabelPaths,
    selection: Selection<'_>,
) -> Result<ExitCode> {
    let mut input = ConsoleInput::new();
    let mut reporter = ConsoleReporter;

    let user = match authenticate(settings, &mut input) {
        Some(user) => user,
        None => {
            eprintln!("User identification is required.");
            return Ok(ExitCode::FAILURE);
        }
    };

    let files = load_templates(settings, paths)?;
    let mut file = match selection {
        Selection::Named(name) => select_template(&files, name)?.clone(),
        Selection::First => files.first().cloned().context("No templates available")?,
        Selection::Ask => pick_template(&files, &mut input)?,
    };

    let primary = load_primary_data(settings);
    let options = FillOptions {
        max_quantity: settings.max_quantity,
        login: settings.login,
        user,
    };
    let engine = FillEngine::new(primary, options);

    let outcome = engine.fill(&file.template, &mut input, &mut reporter);
    let template_changed = file.apply(outcome);

    if template_changed && !file.path.as_os_str().is_empty() {
        TemplateStore::save(&file)?;
    }

    if !file.print {
        eprintln!("Nothing printed.");
        return Ok(ExitCode::FAILURE);
    }

    let printer = Printer::from_settings(settings);
    printer.print(&file)?;
    Ok(ExitCode::SUCCESS)
}

/// Prompt for the user name when login is enabled
///
/// Returns `None` when identification was required but not given.
fn authenticate(settings: &Settings, input: &mut ConsoleInput) -> Option<String> {
    if !settings.login {
        return Some(String::new());
    }
    let user = input.request_input("User identification required: ", "");
    if user.is_empty() {
        None
    } else {
        Some(user)
    }
}

fn load_templates(settings: &Settings, paths: &LabelPaths) -> Result<Vec<LabelFile>> {
    let filter = if settings.filter.is_empty() {
        None
    } else {
        Some(settings.filter.as_str())
    };

    let files = if settings.master_mode() {
        TemplateStore::load_master(
            settings.master_data.as_ref(),
            settings.master_template.as_ref(),
            filter,
        )
        .context("Failed to load master templates")?
    } else {
        let dir = settings.templates_dir(paths);
        TemplateStore::load_dir(&dir, filter)
            .with_context(|| format!("Failed to load templates from {}", dir.display()))?
    };

    Ok(files)
}

/// Load the primary data table, falling back to an empty one
///
/// An unreadable data file must not block printing; the error is reported
/// and fills proceed with interactive prompts only.
fn load_primary_data(settings: &Settings) -> PrimaryData {
    if settings.primary_data.is_empty() {
        return PrimaryData::new();
    }
    match PrimaryData::from_file(&settings.primary_data) {
        Ok(primary) => primary,
        Err(err) => {
            eprintln!("Error: {}", err);
            PrimaryData::new()
        }
    }
}

/// Find a template by exact name or unique substring
fn select_template<'a>(files: &'a [LabelFile], name: &str) -> Result<&'a LabelFile> {
    if let Some(file) = files.iter().find(|f| f.name == name) {
        return Ok(file);
    }

    let needle = name.to_lowercase();
    let matches: Vec<&LabelFile> = files
        .iter()
        .filter(|f| f.name.to_lowercase().contains(&needle))
        .collect();

    match matches.as_slice() {
        [file] => Ok(file),
        [] => bail!("No template matches '{}'", name),
        _ => {
            let names: Vec<&str> = matches.iter().map(|f| f.name.as_str()).collect();
            bail!("'{}' is ambiguous: {}", name, names.join(", "))
        }
    }
}

/// Offer a numbered list of templates and read the selection
fn pick_template(files: &[LabelFile], input: &mut ConsoleInput) -> Result<LabelFile> {
    if files.is_empty() {
        bail!("No templates available");
    }
    if files.len() == 1 {
        return Ok(files[0].clone());
    }

    for (i, file) in files.iter().enumerate() {
        eprintln!("{:3}. {}", i + 1, file);
    }
    let answer = input.request_input("Template number: ", "1");
    let index: usize = answer
        .trim()
        .parse()
        .with_context(|| format!("'{}' is not a template number", answer))?;
    let file = files
        .get(index.wrapping_sub(1))
        .with_context(|| format!("No template numbered {}", index))?;
    Ok(file.clone())
}

/// Interactive input channel reading from stdin
///
/// An empty answer confirms the suggested default; typing `0` or submitting
/// an empty line against an empty default cancels the fill.
struct ConsoleInput {
    stdin: io::Stdin,
}

impl ConsoleInput {
    fn new() -> Self {
        Self { stdin: io::stdin() }
    }
}

impl InputSource for ConsoleInput {
    fn request_input(&mut self, prompt: &str, default_value: &str) -> String {
        if default_value.is_empty() {
            eprint!("{}: ", prompt.trim_end_matches([':', ' ']));
        } else {
            eprint!("{} [{}]: ", prompt.trim_end_matches([':', ' ']), default_value);
        }
        let _ = io::stderr().flush();

        let mut line = String::new();
        if self.stdin.lock().read_line(&mut line).is_err() {
            return String::new();
        }

        let answer = line.trim();
        if answer.is_empty() {
            default_value.to_string()
        } else {
            answer.to_string()
        }
    }
}

/// Reporter writing to stderr so the rendered body stays clean on stdout
struct ConsoleReporter;

impl Reporter for ConsoleReporter {
    fn report_error(&mut self, message: &str) {
        eprintln!("Error: {}", message);
    }

    fn report_info(&mut self, message: &str) {
        eprintln!("{}", message);
    }
}
