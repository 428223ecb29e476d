//! VidSplice - command-line front end
//!
//! Drives one editing session over a described source asset and prints the
//! resulting composition as JSON on stdout. Logs go to stderr.

use anyhow::{anyhow, bail, Context, Result};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};
use vidsplice_core::{FilterCatalog, MediaAsset, TimeRange};
use vidsplice_timeline::{EditingSession, SessionConfig};

const USAGE: &str = "usage: vidsplice <duration-secs> [--no-video] [--no-audio] \
[--split t1,t2,...] [--reorder from:to]... [--swap a:b]... [--filter id] \
[--trim start:end] [--config path] [--save path]";

fn main() -> Result<()> {
    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let options = Options::parse(std::env::args().skip(1))?;
    let config = match &options.config {
        Some(path) => SessionConfig::load_from_file(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => SessionConfig::default(),
    };

    let mut session = EditingSession::new(config)?;
    let asset = MediaAsset::new(
        "input",
        session.time_from_seconds(options.duration),
        options.video,
        options.audio,
    )?;
    session.load(Arc::new(asset));

    for edit in &options.edits {
        match edit {
            Edit::Split(points) => {
                let times: Vec<_> = points.iter().map(|s| session.time_from_seconds(*s)).collect();
                session.split_at(&times)?;
            }
            Edit::Reorder(from, to) => session.reorder(*from, *to)?,
            Edit::Swap(a, b) => session.swap(*a, *b)?,
        }
    }

    if let Some(id) = &options.filter {
        let filter = FilterCatalog::builtin()
            .find(id)
            .ok_or_else(|| anyhow!("unknown filter '{id}'"))?;
        session.attach_filter(Some(filter));
    }

    let composition = match options.trim {
        Some((start, end)) => {
            let range = TimeRange::from_start_end(
                session.time_from_seconds(start),
                session.time_from_seconds(end),
            )?;
            session.trim(range)?
        }
        None => session.merge_all()?,
    };

    if let Some(path) = &options.save {
        session.snapshot()?.save_to_file(path)?;
        info!(path = %path.display(), "Saved session");
    }

    println!("{}", serde_json::to_string_pretty(&composition)?);
    Ok(())
}

#[derive(Debug, Clone, PartialEq)]
enum Edit {
    Split(Vec<f64>),
    Reorder(usize, usize),
    Swap(usize, usize),
}

#[derive(Debug, Clone, PartialEq)]
struct Options {
    duration: f64,
    video: bool,
    audio: bool,
    edits: Vec<Edit>,
    filter: Option<String>,
    trim: Option<(f64, f64)>,
    config: Option<PathBuf>,
    save: Option<PathBuf>,
}

impl Options {
    fn parse(args: impl IntoIterator<Item = String>) -> Result<Self> {
        let mut args = args.into_iter();
        let duration = args
            .next()
            .ok_or_else(|| anyhow!(USAGE))?
            .parse::<f64>()
            .context("duration must be a number of seconds")?;

        let mut options = Self {
            duration,
            video: true,
            audio: true,
            edits: Vec::new(),
            filter: None,
            trim: None,
            config: None,
            save: None,
        };

        while let Some(flag) = args.next() {
            let mut value = || args.next().ok_or_else(|| anyhow!("{flag} needs a value"));
            match flag.as_str() {
                "--no-video" => options.video = false,
                "--no-audio" => options.audio = false,
                "--split" => {
                    let points = value()?
                        .split(',')
                        .filter(|p| !p.is_empty())
                        .map(|p| p.trim().parse::<f64>())
                        .collect::<std::result::Result<Vec<_>, _>>()
                        .context("split points must be seconds")?;
                    options.edits.push(Edit::Split(points));
                }
                "--reorder" => {
                    let (from, to) = parse_pair::<usize>(&value()?)?;
                    options.edits.push(Edit::Reorder(from, to));
                }
                "--swap" => {
                    let (a, b) = parse_pair::<usize>(&value()?)?;
                    options.edits.push(Edit::Swap(a, b));
                }
                "--filter" => options.filter = Some(value()?),
                "--trim" => options.trim = Some(parse_pair::<f64>(&value()?)?),
                "--config" => options.config = Some(PathBuf::from(value()?)),
                "--save" => options.save = Some(PathBuf::from(value()?)),
                other => bail!("unknown option '{other}'\n{USAGE}"),
            }
        }
        Ok(options)
    }
}

fn parse_pair<T>(text: &str) -> Result<(T, T)>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    let (a, b) = text
        .split_once(':')
        .ok_or_else(|| anyhow!("expected a:b, got '{text}'"))?;
    Ok((a.trim().parse()?, b.trim().parse()?))
}
