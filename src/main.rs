//! # threadpack CLI
//!
//! Command-line interface for the threadpack library.

use std::process;
use std::time::Instant;

use clap::Parser as ClapParser;
use tracing_subscriber::EnvFilter;

use threadpack::cli::Args;
use threadpack::{MessageArchive, ThreadpackError};

fn main() {
    let args = <Args as ClapParser>::parse();
    init_tracing(args.log_level());

    if let Err(e) = run(&args) {
        eprintln!("❌ Error: {}", e);
        process::exit(1);
    }
}

fn init_tracing(default_level: &str) {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();
}

fn run(args: &Args) -> Result<(), ThreadpackError> {
    let total_start = Instant::now();
    let formats = args.formats();
    let printing = formats.contains(&threadpack::ExportFormat::Stdout);

    // Transcripts on stdout stay clean when --stdout is requested
    let say = |line: String| {
        if !printing {
            println!("{line}");
        }
    };

    say(format!("📦 threadpack v{}", env!("CARGO_PKG_VERSION")));
    say("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━".to_string());
    say(format!("📂 Input:   {}", args.input.display()));
    if !formats.is_empty() {
        let names: Vec<_> = formats.iter().map(ToString::to_string).collect();
        say(format!("📄 Formats: {}", names.join(", ")));
        say(format!("💾 Output:  {}", args.dir.display()));
    }
    if let Some(ref replace) = args.replace {
        say(format!("🔁 Names:   {}", replace.display()));
    }
    say(String::new());

    // Input errors stop the run before anything is parsed
    let config = args.archive_config()?;
    let mut archive = MessageArchive::new(&args.input, config)?;

    if args.sanitize {
        say("🧹 Sanitizing archive...".to_string());
    }
    say("⏳ Parsing archive...".to_string());
    let parse_start = Instant::now();
    let thread_count = archive.threads()?.len();
    say(format!(
        "   Found {} threads ({:.2}s)",
        thread_count,
        parse_start.elapsed().as_secs_f64()
    ));
    if let Some(backup) = archive.backup_path() {
        say(format!("   Backup saved to {}", backup.display()));
    }

    for format in &formats {
        say(format!("💾 Writing {}...", format));
        let write_start = Instant::now();
        let written = archive.write(&args.dir, *format)?;
        if format.extension().is_some() {
            say(format!(
                "   {} files written ({:.2}s)",
                written.len(),
                write_start.elapsed().as_secs_f64()
            ));
        }
    }

    if let Some(stats) = archive.stats() {
        say(String::new());
        say("📊 Summary:".to_string());
        say(format!("   Fragments: {}", stats.fragments));
        say(format!(
            "   Threads:   {} ({:.1}% merged)",
            stats.threads,
            stats.merge_ratio()
        ));
        say(format!("   Messages:  {}", stats.messages));
    }

    say(String::new());
    say(format!(
        "✅ Done in {:.2}s",
        total_start.elapsed().as_secs_f64()
    ));

    Ok(())
}
