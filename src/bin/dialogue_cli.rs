use std::fs;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use std::thread;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use dialogue_engine::{
    run_headless, AnsiRenderer, ConfigurableInput, DialogueConfig, DialoguePlayer,
    HeadlessOptions, InputAction, RenderBackend, ResolvedConfig, Script, SecurityPolicy,
};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "Dialogue engine CLI")]
struct Cli {
    /// TOML config file; defaults apply when omitted.
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Validate a script JSON file.
    Validate { script: PathBuf },
    /// Play a script headlessly and print the frame trace.
    Trace {
        script: PathBuf,
        #[arg(long, default_value = "Rin")]
        name: String,
        #[arg(long, default_value_t = 1_000)]
        steps: usize,
        /// Confirm while lines are still typing.
        #[arg(long, default_value_t = false)]
        skip: bool,
        /// Write the trace as JSON instead of printing it.
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Play a script in the terminal. Enter advances, `q` quits.
    Play { script: PathBuf },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref())?;
    match cli.command {
        Command::Validate { script } => {
            load_script(&script, &config)?;
            println!("{}: ok", script.display());
            Ok(())
        }
        Command::Trace {
            script,
            name,
            steps,
            skip,
            output,
        } => trace_script(&script, config, name, steps, skip, output.as_deref()),
        Command::Play { script } => play_script(&script, config),
    }
}

fn load_config(path: Option<&Path>) -> Result<ResolvedConfig> {
    let config = match path {
        Some(path) => DialogueConfig::load_from(path)
            .with_context(|| format!("load config {}", path.display()))?,
        None => DialogueConfig::default(),
    };
    Ok(config.resolve()?)
}

fn load_script(path: &Path, config: &ResolvedConfig) -> Result<Script> {
    let raw = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    let script = Script::from_json_with_limits(&raw, config.limits).context("parse script")?;
    SecurityPolicy::default().validate(&script, config.limits, &config.placeholder)?;
    Ok(script)
}

fn trace_script(
    path: &Path,
    config: ResolvedConfig,
    name: String,
    steps: usize,
    skip: bool,
    output: Option<&Path>,
) -> Result<()> {
    let script = load_script(path, &config)?;
    let mut player = DialoguePlayer::new(config);
    player.begin_script(script);
    let options = HeadlessOptions {
        player_name: name,
        max_steps: steps,
        skip_reveal: skip,
    };
    let trace = run_headless(&mut player, &options);
    match output {
        Some(output) => {
            let json = serde_json::to_string_pretty(&trace)?;
            if let Some(parent) = output.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::write(output, json).with_context(|| format!("write {}", output.display()))?;
        }
        None => print!("{}", trace.to_text()),
    }
    Ok(())
}

fn play_script(path: &Path, config: ResolvedConfig) -> Result<()> {
    let script = load_script(path, &config)?;
    let renderer = AnsiRenderer {
        default_color: config.default_text_color,
    };
    let delay = config.char_delay;
    let input = ConfigurableInput::default();
    let mut player = DialoguePlayer::new(config);
    player.begin_script(script);

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    loop {
        while player.signals().is_revealing {
            player.tick(Instant::now());
            draw(&player, &renderer)?;
            thread::sleep(delay);
        }
        draw(&player, &renderer)?;
        if player.signals().script_complete {
            break;
        }

        let Some(line) = lines.next() else {
            break;
        };
        let line = line?;
        let capturing = player.signals().is_capturing_name;
        if capturing {
            for c in line.chars() {
                player.apply_input(input.handle_key("", Some(c), true));
            }
        }
        let action = if !capturing && line.trim() == "q" {
            input.handle_key("Escape", None, false)
        } else {
            input.handle_key("Enter", None, capturing)
        };
        if !player.apply_input(action) {
            break;
        }
        if action == InputAction::None {
            tracing::warn!(line = %line, "unrecognized input");
        }
    }
    Ok(())
}

fn draw(player: &DialoguePlayer, renderer: &AnsiRenderer) -> Result<()> {
    let frame = player.frame();
    let mut out = io::stdout().lock();
    write!(out, "\x1b[2J\x1b[H")?;
    if let Some(speaker) = &frame.speaker {
        let color = speaker.color;
        writeln!(
            out,
            "\x1b[1;38;2;{};{};{}m{}\x1b[0m",
            color.r, color.g, color.b, speaker.name
        )?;
    }
    writeln!(out, "{}", renderer.render(&frame.layout).text)?;
    if let Some(name) = &frame.name_input {
        writeln!(out, "\nName: {name}_")?;
    }
    if frame.signals.script_complete {
        writeln!(out, "\n-- end --")?;
    }
    out.flush()?;
    Ok(())
}
