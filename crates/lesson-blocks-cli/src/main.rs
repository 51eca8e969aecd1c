use anyhow::{Context, Result, bail};
use lesson_blocks_config::{Config, DEFAULT_PREVIEW_LENGTH};
use lesson_blocks_engine::{
    Document, FileLessonStore, LessonService, SessionContext, codec, io, render_document,
};
use log::debug;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::{env, fs, process};

const USAGE: &str = "\
Usage:
  lesson-blocks-cli render <file>          Print lesson content as HTML
  lesson-blocks-cli preview <file> [len]   Print a plain-text excerpt
  lesson-blocks-cli normalize <file>       Print content in the structured format
  lesson-blocks-cli blocks <file>          List blocks as `index: kind`
  lesson-blocks-cli lessons [dir]          List stored lessons with excerpts";

#[derive(Debug, PartialEq, Eq)]
enum Command {
    Render(PathBuf),
    Preview(PathBuf, Option<usize>),
    Normalize(PathBuf),
    Blocks(PathBuf),
    Lessons(Option<PathBuf>),
}

impl Command {
    fn parse(args: &[String]) -> Result<Self> {
        let Some(name) = args.first() else {
            bail!("No command given");
        };
        let file = || -> Result<PathBuf> {
            args.get(1)
                .map(PathBuf::from)
                .with_context(|| format!("`{name}` needs a file argument"))
        };
        let command = match name.as_str() {
            "render" => Command::Render(file()?),
            "preview" => {
                let len = args
                    .get(2)
                    .map(|len| len.parse::<usize>())
                    .transpose()
                    .with_context(|| format!("Invalid preview length: {}", args[2]))?;
                Command::Preview(file()?, len)
            }
            "normalize" => Command::Normalize(file()?),
            "blocks" => Command::Blocks(file()?),
            "lessons" => Command::Lessons(args.get(1).map(PathBuf::from)),
            other => bail!("Unknown command: {other}"),
        };
        Ok(command)
    }
}

fn read_content(path: &Path) -> Result<String> {
    fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))
}

fn block_listing(raw: &str) -> String {
    let document = codec::deserialize(raw);
    let mut lines: Vec<String> = document
        .blocks()
        .iter()
        .enumerate()
        .map(|(i, block)| format!("{i}: {}", block.type_name()))
        .collect();
    if document.is_legacy() {
        lines.push("(legacy content)".to_string());
    }
    lines.join("\n")
}

fn lesson_listing(lessons_path: &Path, preview_length: usize) -> Result<String> {
    let store = FileLessonStore::new(lessons_path);
    let ids = store.lesson_ids()?;
    let service = LessonService::new(Arc::new(store), SessionContext::anonymous())
        .with_preview_length(preview_length);
    let mut lines = Vec::with_capacity(ids.len());
    for id in ids {
        let lesson = service.view_lesson(id)?;
        let marker = if lesson.legacy { " (legacy)" } else { "" };
        lines.push(format!("{id}{marker}: {}", lesson.preview));
    }
    Ok(lines.join("\n"))
}

fn run(command: Command, config: Option<&Config>) -> Result<String> {
    let output = match command {
        Command::Render(path) => render_document(&codec::deserialize(&read_content(&path)?)),
        Command::Preview(path, len) => {
            let len = len
                .or(config.map(|c| c.preview_length))
                .unwrap_or(DEFAULT_PREVIEW_LENGTH);
            lesson_blocks_engine::content_preview(&read_content(&path)?, len)
        }
        Command::Normalize(path) => {
            // Re-wrapping the blocks drops the legacy origin, so old content
            // is written out in the structured form
            let blocks = codec::deserialize(&read_content(&path)?).into_blocks();
            codec::serialize(&Document::from_blocks(blocks))?
        }
        Command::Blocks(path) => block_listing(&read_content(&path)?),
        Command::Lessons(dir) => {
            let lessons_path = match (dir, config) {
                (Some(dir), _) => dir,
                (None, Some(config)) => config.lessons_path.clone(),
                (None, None) => bail!(
                    "No lessons directory given and no config file found at {}",
                    Config::config_path().display()
                ),
            };
            io::validate_lessons_dir(&lessons_path).with_context(|| {
                format!("Lessons path '{}' is invalid", lessons_path.display())
            })?;
            let preview_length = config.map_or(DEFAULT_PREVIEW_LENGTH, |c| c.preview_length);
            lesson_listing(&lessons_path, preview_length)?
        }
    };
    Ok(output)
}

fn main() -> Result<()> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    let args: Vec<String> = env::args().skip(1).collect();
    let command = match Command::parse(&args) {
        Ok(command) => command,
        Err(e) => {
            eprintln!("Error: {e}");
            eprintln!("{USAGE}");
            process::exit(1);
        }
    };

    let config = match Config::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Warning: ignoring config file: {e}");
            None
        }
    };
    if config.is_some() {
        debug!("Loaded config from {}", Config::config_path().display());
    }

    println!("{}", run(command, config.as_ref())?);
    Ok(())
}
