// Copyright (c) UnnamedOrange. Licensed under the MIT License.
// See the LICENSE file in the repository root for full license text.

use std::fs;

use clap::{CommandFactory, Parser};
use telemark::cli::CliArgs;
use telemark_core::SendUnit;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = CliArgs::parse();
    if let Err(error) = run(args) {
        eprintln!("{error}");
        std::process::exit(1);
    }
}

fn run(args: CliArgs) -> telemark_core::Result<()> {
    if args.inputs.is_empty() {
        if args.output.is_some() {
            return Err("没有输入文件".into());
        }
        CliArgs::command().print_help()?;
        return Ok(());
    }

    let options = telemark::config::load_options(args.config.as_deref())?;

    let mut markdown = String::new();
    for input in &args.inputs {
        markdown.push_str(&fs::read_to_string(input)?);
    }

    let out = if args.split {
        render_units(&telemark_core::split_str_with_options(&markdown, &options)?)
    } else {
        telemark_core::convert_str_with_options(&markdown, &options)?
    };

    match &args.output {
        Some(path) => fs::write(path, out)?,
        None => print!("{out}"),
    }
    Ok(())
}

fn render_units(units: &[SendUnit]) -> String {
    let mut out = String::new();
    for (index, unit) in units.iter().enumerate() {
        let index = index + 1;
        match unit {
            SendUnit::Text { content } => {
                out.push_str(&format!("[{index}] text\n{content}\n"));
            }
            SendUnit::File {
                file_name,
                file_data,
                caption,
            } => {
                out.push_str(&format!(
                    "[{index}] file {file_name} ({} bytes)\n",
                    file_data.len()
                ));
                if !caption.is_empty() {
                    out.push_str(caption);
                    out.push('\n');
                }
            }
            SendUnit::Photo {
                file_name,
                file_data,
                caption,
            } => {
                out.push_str(&format!(
                    "[{index}] photo {file_name} ({} bytes)\n",
                    file_data.len()
                ));
                if !caption.is_empty() {
                    out.push_str(caption);
                    out.push('\n');
                }
            }
        }
    }
    out
}
