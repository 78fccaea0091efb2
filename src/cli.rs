//! Command-line surface and interactive playback prompts.

use crate::log::{DeviceClass, LogFileInfo};
use crate::playback::LoopCount;
use crate::session::{PlaybackPrompter, PlaybackRequest};
use async_trait::async_trait;
use clap::{Parser, ValueEnum};
use std::io::{self, BufRead, Write};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "inputtape", version, about = "Record and replay keyboard/mouse input")]
pub struct Cli {
    /// Which input device class to record and replay
    #[arg(long, value_enum, default_value_t = DeviceArg::Keyboard)]
    pub device: DeviceArg,

    /// Override the log directory (defaults to a per-device directory)
    #[arg(long)]
    pub log_dir: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum DeviceArg {
    Keyboard,
    Mouse,
}

impl From<DeviceArg> for DeviceClass {
    fn from(arg: DeviceArg) -> Self {
        match arg {
            DeviceArg::Keyboard => DeviceClass::Keyboard,
            DeviceArg::Mouse => DeviceClass::Mouse,
        }
    }
}

/// 1-based file selection; `None` on anything non-numeric or out of range.
pub fn parse_selection(input: &str, count: usize) -> Option<usize> {
    let choice: usize = input.trim().parse().ok()?;
    (1..=count).contains(&choice).then(|| choice - 1)
}

/// A positive, finite speed multiplier.
pub fn parse_speed(input: &str) -> Option<f64> {
    let speed: f64 = input.trim().parse().ok()?;
    (speed.is_finite() && speed > 0.0).then_some(speed)
}

pub fn parse_loop_count(input: &str) -> Option<LoopCount> {
    input.parse().ok()
}

/// Prompts on stdin/stdout, re-asking until the input is valid.
pub struct CliPrompter;

#[async_trait]
impl PlaybackPrompter for CliPrompter {
    async fn request(&mut self, files: &[LogFileInfo]) -> Option<PlaybackRequest> {
        let files = files.to_vec();
        // Blocking stdin reads must not stall the runtime
        tokio::task::spawn_blocking(move || prompt_blocking(&files))
            .await
            .ok()
            .flatten()
    }
}

fn prompt_blocking(files: &[LogFileInfo]) -> Option<PlaybackRequest> {
    println!("Available log files:");
    for (i, file) in files.iter().enumerate() {
        println!("  {}: {}", i + 1, file.name);
    }

    let index = ask(
        &format!("Enter the number of the file to play (1-{}): ", files.len()),
        |line| parse_selection(line, files.len()),
    )?;
    let path = files[index].path.clone();

    let loops = ask(
        "How many times to play? (e.g., 1, 5, 0 to skip, or 'infinite'): ",
        parse_loop_count,
    )?;
    if loops.is_zero() {
        // No point asking for a speed that will never be used
        return Some(PlaybackRequest {
            path,
            loops,
            speed: 1.0,
        });
    }

    let speed = ask(
        "Enter playback speed multiplier (e.g., 1.0 = normal speed): ",
        parse_speed,
    )?;

    Some(PlaybackRequest { path, loops, speed })
}

/// Re-prompt until `parse` accepts the line; `None` when stdin closes.
fn ask<T>(prompt: &str, parse: impl Fn(&str) -> Option<T>) -> Option<T> {
    let stdin = io::stdin();
    loop {
        print!("{prompt}");
        let _ = io::stdout().flush();

        let mut line = String::new();
        if stdin.lock().read_line(&mut line).ok()? == 0 {
            return None;
        }
        match parse(&line) {
            Some(value) => return Some(value),
            None => println!("Invalid input, try again."),
        }
    }
}
