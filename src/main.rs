//! glossa - EPUB chapter extraction and bilingual study packages

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use serde::Deserialize;

use glossa::{AudioAsset, EpubReader, EpubWriter, ExportRequest, WriterConfig};

#[derive(Parser)]
#[command(name = "glossa")]
#[command(version, about = "EPUB chapter extraction and bilingual study packages", long_about = None)]
#[command(after_help = "EXAMPLES:
    glossa chapters novel.epub             List chapters
    glossa chapters novel.epub --json      Dump chapters as JSON
    glossa export request.json -o out.epub Build a study package")]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Suppress output messages
    #[arg(short, long, global = true)]
    quiet: bool,
}

#[derive(Subcommand)]
enum Command {
    /// List the chapters of an EPUB
    Chapters {
        /// Input EPUB file
        #[arg(value_name = "INPUT")]
        input: PathBuf,

        /// Print the full chapters as JSON
        #[arg(long)]
        json: bool,

        /// Drop chapters with this many characters or fewer
        #[arg(long, value_name = "N")]
        min_chars: Option<usize>,
    },
    /// Build a single-chapter study package from a JSON request
    Export {
        /// Request file (JSON)
        #[arg(value_name = "REQUEST")]
        request: PathBuf,

        /// Output file (defaults to the title with an .epub extension)
        #[arg(short, long, value_name = "OUTPUT")]
        output: Option<PathBuf>,

        /// Deflate level, 0-9
        #[arg(long, value_name = "N", value_parser = clap::value_parser!(u32).range(0..=9))]
        level: Option<u32>,

        /// Language tag for the package
        #[arg(long, value_name = "TAG", default_value = "en")]
        lang: String,
    },
}

/// On-disk form of an export request. Audio is referenced by path, relative
/// to the request file.
#[derive(Deserialize)]
struct RequestFile {
    title: String,
    #[serde(default)]
    paragraphs: Vec<String>,
    #[serde(default)]
    translations: BTreeMap<usize, String>,
    #[serde(default)]
    analyses: BTreeMap<usize, String>,
    #[serde(default)]
    chapter_audio: Option<PathBuf>,
    #[serde(default)]
    paragraph_audio: BTreeMap<usize, PathBuf>,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let result = match cli.command {
        Command::Chapters {
            input,
            json,
            min_chars,
        } => list_chapters(&input, json, min_chars),
        Command::Export {
            request,
            output,
            level,
            lang,
        } => export(&request, output, level, lang, cli.quiet),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn list_chapters(path: &Path, json: bool, min_chars: Option<usize>) -> Result<(), String> {
    let mut reader = EpubReader::new();
    if let Some(n) = min_chars {
        reader = reader.with_min_content_chars(n);
    }

    let bytes = std::fs::read(path).map_err(|e| format!("{}: {e}", path.display()))?;
    let chapters = reader.read(&bytes).map_err(|e| e.to_string())?;

    if json {
        let out = serde_json::to_string_pretty(&chapters).map_err(|e| e.to_string())?;
        println!("{out}");
        return Ok(());
    }

    println!("File: {}", path.display());
    println!("Chapters: {}", chapters.len());
    for chapter in &chapters {
        println!(
            "{:>4}  {}  ({} chars)",
            chapter.id,
            chapter.title,
            chapter.content.chars().count()
        );
    }
    Ok(())
}

fn export(
    path: &Path,
    output: Option<PathBuf>,
    level: Option<u32>,
    language: String,
    quiet: bool,
) -> Result<(), String> {
    let text = std::fs::read_to_string(path).map_err(|e| format!("{}: {e}", path.display()))?;
    let file: RequestFile =
        serde_json::from_str(&text).map_err(|e| format!("{}: {e}", path.display()))?;

    let base = path.parent().unwrap_or(Path::new(""));
    let request = load_request(file, base)?;

    let output = output.unwrap_or_else(|| PathBuf::from(glossa::suggested_file_name(&request.title)));
    let writer = EpubWriter::new().with_config(WriterConfig {
        compression_level: level,
        language,
    });
    let bytes = writer.write(&request).map_err(|e| e.to_string())?;
    std::fs::write(&output, &bytes).map_err(|e| format!("{}: {e}", output.display()))?;

    if !quiet {
        println!(
            "Wrote {} ({} paragraphs, {} bytes)",
            output.display(),
            request.paragraphs.len(),
            bytes.len()
        );
    }
    Ok(())
}

fn load_request(file: RequestFile, base: &Path) -> Result<ExportRequest, String> {
    let mut request = ExportRequest::new(file.title, file.paragraphs);
    request.translations = file.translations;
    request.analyses = file.analyses;

    if let Some(audio) = file.chapter_audio {
        request.chapter_audio = Some(load_audio(base, &audio)?);
    }
    for (index, audio) in file.paragraph_audio {
        request.paragraph_audio.insert(index, load_audio(base, &audio)?);
    }
    Ok(request)
}

fn load_audio(base: &Path, path: &Path) -> Result<AudioAsset, String> {
    let path = base.join(path);
    std::fs::read(&path)
        .map(AudioAsset::new)
        .map_err(|e| format!("{}: {e}", path.display()))
}
