mod cli;

use trackforged::{
    config,
    decision::{Decision, Rationale},
    plugins::{self, PluginInput, PluginKind},
    resolver::Resolver,
};

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Commands};
use std::path::Path;
use trackforged_common::CodecType;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    // Respect RUST_LOG env var if set, otherwise use defaults based on verbose flag
    let env_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| {
        if cli.verbose {
            "trackforged=trace,trackforged_av=debug,trackforged_common=debug,reqwest=debug"
                .to_string()
        } else {
            "trackforged=info,trackforged_av=info".to_string()
        }
    });

    // Logs go to stderr so decisions on stdout stay machine-readable
    tracing_subscriber::fmt()
        .with_env_filter(&env_filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Decide {
            input,
            plugin,
            host_json,
            envelope,
        } => decide(&input, plugin, host_json, envelope, cli.config.as_deref()),
        Commands::Probe { file, json } => probe_file(&file, json),
        Commands::Resolve { name } => resolve(&name, cli.config.as_deref()),
        Commands::CheckTools => check_tools(),
        Commands::Validate {
            config: config_path,
        } => {
            let path = config_path.or(cli.config);
            validate_config(path.as_deref())
        }
        Commands::Version => {
            println!("trackforged {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}

fn decide(
    input: &Path,
    plugin: PluginKind,
    host_json: bool,
    envelope: bool,
    config_path: Option<&Path>,
) -> Result<()> {
    let config = config::load_config_or_default(config_path)?;

    let content = std::fs::read_to_string(input)
        .with_context(|| format!("Failed to read input file: {:?}", input))?;
    let plugin_input = if host_json {
        PluginInput::from_host_json(&content)?
    } else {
        serde_json::from_str::<PluginInput>(&content)
            .with_context(|| format!("Failed to parse plugin input: {:?}", input))?
    };

    tracing::info!(plugin = %plugin, file = %plugin_input.display_name, "Running plugin");

    let rt = tokio::runtime::Runtime::new()?;
    let decision = rt.block_on(plugins::decide(plugin, &config, &plugin_input));

    if envelope {
        let json = serde_json::to_string_pretty(&decision.to_host_response())?;
        println!("{}", json);
    } else {
        print_decision(&decision);
    }

    Ok(())
}

fn print_decision(decision: &Decision) {
    for line in decision.rationale() {
        println!("{}", line);
    }
    println!();
    if decision.should_process() {
        println!("Process: yes");
        println!("Instruction: {}", decision.instruction());
    } else {
        println!("Process: no");
    }
    println!("Container: .{}", decision.output_container());
    if decision.requeue_after() {
        println!("Re-queue after processing: yes");
    }
}

fn probe_file(file: &Path, json: bool) -> Result<()> {
    if !file.exists() {
        anyhow::bail!("File does not exist: {:?}", file);
    }

    let report = trackforged_av::probe::probe(file)?;

    if json {
        let json_str = serde_json::to_string_pretty(&report)?;
        println!("{}", json_str);
        return Ok(());
    }

    let input = PluginInput::from_probe(file, report);
    println!("File: {}", input.path);
    println!("Container: {}", input.container);
    println!("Size: {} bytes", input.file_size);

    for (label, codec_type) in [
        ("Video", CodecType::Video),
        ("Audio", CodecType::Audio),
        ("Subtitle", CodecType::Subtitle),
    ] {
        let streams = input.streams.positions(codec_type);
        println!("\n{} Tracks: {}", label, streams.len());
        for entry in streams {
            print!("  [{}] #{}", entry.position, entry.stream.index);
            if let Some(ref lang) = entry.stream.language {
                print!(" ({})", lang);
            }
            if let Some(ref title) = entry.stream.title {
                print!(" \"{}\"", title);
            }
            println!();
        }
    }

    if trackforged_av::probe::is_mp4_family(&input.container) {
        let detection = trackforged_av::detect(&input.structure);
        println!("\nFaststart: {} ({})", detection.status, detection.signal);
        for note in &detection.notes {
            println!("  {}", note);
        }
    }

    Ok(())
}

fn resolve(name: &str, config_path: Option<&Path>) -> Result<()> {
    let config = config::load_config_or_default(config_path)?;
    let resolver = Resolver::from_config(&config);

    let rt = tokio::runtime::Runtime::new()?;
    let mut rationale = Rationale::new();
    let identity = rt.block_on(resolver.resolve(name, &mut rationale));

    for line in rationale.lines() {
        println!("{}", line);
    }
    println!();
    if identity.is_fallback() {
        println!("No metadata found, fallback language: {}", identity.native_language());
    } else {
        println!(
            "Original language: {} ({}) via {}",
            identity.native_language(),
            identity.original_language,
            identity.provider
        );
    }

    Ok(())
}

fn check_tools() -> Result<()> {
    println!("Checking external tools...\n");

    let tools = trackforged_av::check_tools();
    let mut all_ok = true;

    for tool in &tools {
        let status = if tool.available {
            "✓"
        } else {
            all_ok = false;
            "✗"
        };

        print!("{} {}", status, tool.name);

        if let Some(ref version) = tool.version {
            print!(" ({})", version.lines().next().unwrap_or(""));
        }

        if let Some(ref path) = tool.path {
            print!(" - {}", path.display());
        }

        println!();
    }

    println!();
    if all_ok {
        println!("All required tools are available!");
    } else {
        println!("Some tools are missing. Only `probe` needs them; plugins work without.");
    }

    Ok(())
}

fn validate_config(path: Option<&Path>) -> Result<()> {
    match path {
        Some(p) => {
            println!("Validating config: {:?}", p);
            let config = config::load_config(p)?;
            println!("✓ Configuration is valid");
            println!("  Priority: {}", config.priority);
            println!("  Request timeout: {}s", config.request_timeout_secs);
            println!(
                "  User languages: {}",
                config.languages.user_languages.join(", ")
            );
            println!("  TMDB key set: {}", !config.tmdb.api_key.trim().is_empty());
            println!("  Arr integrations: {}", config.arrs.len());
            println!(
                "    Enabled: {}",
                config.arrs.iter().filter(|a| a.enabled).count()
            );
        }
        None => {
            println!("No config file specified, using defaults");
            let config = config::Config::default();
            println!("Default config:");
            println!("  Priority: {}", config.priority);
            println!("  Native language: {}", config.languages.native_language);
            println!("  Containers: {}", config.limits.containers.join(", "));
        }
    }

    Ok(())
}
