use crate::config::Config;
use crate::media::SUPPORTED_EXTENSIONS;
use crate::pipeline::DEFAULT_OUTPUT_NAME;
use console::style;
use dialoguer::{Confirm, Input, Select};
use std::fs;
use std::path::PathBuf;

const VOICES: &[(&str, &str)] = &[
    ("en-US-Standard-C", "Standard female"),
    ("en-US-Standard-B", "Standard male"),
    ("en-US-Wavenet-J", "Wavenet male"),
    ("en-US-Wavenet-F", "Wavenet female"),
];

pub struct InteractiveResult {
    pub input: PathBuf,
    pub output: PathBuf,
    pub config: Config,
}

pub fn run_interactive_wizard() -> anyhow::Result<InteractiveResult> {
    print_header();

    // Step 1: Check/Setup API keys
    let mut config = setup_api_keys()?;

    // Step 2: Select source video
    let input = select_source_file()?;

    // Step 3: Select synthesis voice
    config.voice = select_voice()?;

    // Derive output path
    let output = PathBuf::from(DEFAULT_OUTPUT_NAME);

    // Step 4: Confirm
    print_summary(&input, &output, &config);

    if !Confirm::new()
        .with_prompt("Proceed with these settings?")
        .default(true)
        .interact()?
    {
        anyhow::bail!("Cancelled by user");
    }

    println!();

    Ok(InteractiveResult {
        input,
        output,
        config,
    })
}

fn print_header() {
    println!();
    println!(
        "{}",
        style("╔═══════════════════════════════════════════════════╗").cyan()
    );
    println!(
        "{}",
        style("║      revoice - Video Audio Replacement with AI    ║").cyan()
    );
    println!(
        "{}",
        style("╚═══════════════════════════════════════════════════╝").cyan()
    );
    println!();
}

fn setup_api_keys() -> anyhow::Result<Config> {
    let mut config = Config::load().unwrap_or_default();

    if config.google_api_key.is_some() && config.openai_api_key.is_some() {
        println!("{} API keys configured", style("✓").green());
        return Ok(config);
    }

    if config.google_api_key.is_none() {
        println!("{} Google API key not found", style("!").yellow());
        println!("  Used for speech recognition and synthesis.\n");

        let api_key: String = Input::new()
            .with_prompt("Enter your Google API key")
            .interact_text()?;

        if api_key.trim().is_empty() {
            anyhow::bail!("Google API key is required");
        }

        config.google_api_key = Some(api_key.trim().to_string());
    }

    if config.openai_api_key.is_none() {
        println!("{} OpenAI API key not found", style("!").yellow());
        println!("  Used for transcript correction.\n");

        let api_key: String = Input::new()
            .with_prompt("Enter your OpenAI API key")
            .interact_text()?;

        if api_key.trim().is_empty() {
            anyhow::bail!("OpenAI API key is required");
        }

        config.openai_api_key = Some(api_key.trim().to_string());
    }

    // Offer to save
    if Confirm::new()
        .with_prompt("Save API keys to config file?")
        .default(true)
        .interact()?
    {
        save_config(&config)?;
        println!("{} API keys saved to config\n", style("✓").green());
    }

    Ok(config)
}

fn save_config(config: &Config) -> anyhow::Result<()> {
    if let Some(config_dir) = dirs::config_dir() {
        let revoice_dir = config_dir.join("revoice");
        fs::create_dir_all(&revoice_dir)?;

        let config_path = revoice_dir.join("config.toml");
        let toml_content = toml::to_string_pretty(config)?;
        fs::write(config_path, toml_content)?;
    }
    Ok(())
}

fn select_source_file() -> anyhow::Result<PathBuf> {
    println!("\n{}", style("Select video file:").bold());

    let files = scan_video_files(".")?;

    if files.is_empty() {
        println!("  No video files found in current directory.\n");
        let path: String = Input::new()
            .with_prompt("Enter file path")
            .interact_text()?;
        let path = PathBuf::from(path);
        if !path.exists() {
            anyhow::bail!("File not found: {}", path.display());
        }
        return Ok(path);
    }

    let display_items: Vec<String> = files
        .iter()
        .map(|f| {
            let size = fs::metadata(f)
                .map(|m| format_size(m.len()))
                .unwrap_or_else(|_| "?".to_string());
            format!("{} ({})", f.display(), size)
        })
        .collect();

    let mut items = display_items.clone();
    items.push("Enter custom path...".to_string());

    let selection = Select::new()
        .with_prompt("Choose a file")
        .items(&items)
        .default(0)
        .interact()?;

    if selection == files.len() {
        // Custom path
        let path: String = Input::new()
            .with_prompt("Enter file path")
            .interact_text()?;
        let path = PathBuf::from(path);
        if !path.exists() {
            anyhow::bail!("File not found: {}", path.display());
        }
        Ok(path)
    } else {
        Ok(files[selection].clone())
    }
}

fn scan_video_files(dir: &str) -> anyhow::Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();

        if path.is_file() {
            if let Some(ext) = path.extension().and_then(|e| e.to_str()) {
                if SUPPORTED_EXTENSIONS.contains(&ext.to_lowercase().as_str()) {
                    files.push(path);
                }
            }
        }
    }

    files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(files)
}

fn format_size(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if bytes >= GB {
        format!("{:.1} GB", bytes as f64 / GB as f64)
    } else if bytes >= MB {
        format!("{:.1} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.1} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} B", bytes)
    }
}

fn select_voice() -> anyhow::Result<String> {
    let items: Vec<String> = VOICES
        .iter()
        .map(|(name, desc)| format!("{} - {}", name, desc))
        .collect();

    let mut options = items.clone();
    options.push("Other (enter voice name)...".to_string());

    let selection = Select::new()
        .with_prompt("Select synthesis voice")
        .items(&options)
        .default(0)
        .interact()?;

    if selection == VOICES.len() {
        let name: String = Input::new()
            .with_prompt("Enter voice name (e.g., 'en-US-Wavenet-D')")
            .interact_text()?;
        Ok(name.trim().to_string())
    } else {
        Ok(VOICES[selection].0.to_string())
    }
}

fn print_summary(input: &PathBuf, output: &PathBuf, config: &Config) {
    println!("\n{}", style("═══ Summary ═══").bold());
    println!("  Input:     {}", style(input.display()).cyan());
    println!("  Output:    {}", style(output.display()).cyan());
    println!("  Language:  {}", config.language);
    println!("  Voice:     {}", config.voice);
    println!("  Model:     {}", config.model);
    println!();
}
