use std::io::Write as _;

use anyhow::{Context, bail};
use camino::{Utf8Path, Utf8PathBuf};
use kifu_board::{BoardSize, Goban};
use kifu_errors::{Diagnostics, Renderer};
use kifu_inputs::File;
use kifu_parse::{ParseOptions, Statistics, parse, parse_with};
use kifu_patterns::{MergeOptions, PatternTree};
use kifu_tree::printer::{PrintOptions, to_sgf_string};
use kifu_tree::properties::PropertyTable;

fn read(path: &Utf8Path) -> anyhow::Result<File> {
    File::read(path.to_owned()).with_context(|| format!("failed to read `{path}`"))
}

fn write_output(output: Option<&Utf8Path>, text: &str) -> anyhow::Result<()> {
    match output {
        Some(path) => {
            std::fs::write(path, text).with_context(|| format!("failed to write `{path}`"))
        }
        None => std::io::stdout().write_all(text.as_bytes()).context("failed to write output"),
    }
}

fn show(file: &File, diagnostics: &Diagnostics, renderer: &Renderer, short: bool) {
    for diagnostic in diagnostics {
        if short {
            let (line, col) = file.line_col(diagnostic.range().start());
            eprintln!(
                "{}:{line}:{col}: {}: {}",
                file.path(),
                diagnostic.severity(),
                diagnostic.message()
            );
        } else {
            eprintln!("{}", diagnostic.render(renderer, file.path().as_str(), file.text()));
        }
    }
}

fn options_for(path: &Utf8Path, options: &ParseOptions) -> ParseOptions {
    ParseOptions { file_name: path.to_string(), ..options.clone() }
}

pub(crate) fn check(
    files: &[Utf8PathBuf],
    options: &ParseOptions,
    short: bool,
) -> anyhow::Result<()> {
    let renderer = Renderer::styled();
    let mut failed = 0;
    for path in files {
        let file = read(path)?;
        let parse = parse(file.text(), &options_for(path, options));
        show(&file, &parse.diagnostics, &renderer, short);
        if parse.diagnostics.has_errors() {
            failed += 1;
        }
        tracing::info!(
            file = %path,
            nodes = parse.tree.len(),
            properties = parse.tree.property_count(),
            limit_reached = parse.limit_reached,
            "checked"
        );
    }
    if failed > 0 {
        bail!("{failed} of {} files have errors", files.len());
    }
    Ok(())
}

pub(crate) fn print(
    path: &Utf8Path,
    output: Option<&Utf8Path>,
    print: &PrintOptions,
    labels: bool,
) -> anyhow::Result<()> {
    let file = read(path)?;
    let mut parse = parse(file.text(), &options_for(path, &ParseOptions::default()));
    show(&file, &parse.diagnostics, &Renderer::styled(), false);
    if parse.aborted {
        bail!("`{path}` could not be read to the end");
    }
    if labels {
        let written = parse.tree.relabel()?;
        tracing::debug!(written, "labelled branching nodes");
    }
    let text = to_sgf_string(&parse.tree, print)?;
    write_output(output, &text)
}

pub(crate) fn patterns(
    files: &[Utf8PathBuf],
    size: u32,
    handicap: u8,
    merge: &MergeOptions,
    output: Option<&Utf8Path>,
) -> anyhow::Result<()> {
    let mut patterns = PatternTree::new(BoardSize::new(size, size)?, handicap)?;
    let options = ParseOptions { comments: false, play: false, ..ParseOptions::default() };
    let renderer = Renderer::styled();
    let mut merged = 0;

    for path in files {
        let file = read(path)?;
        let parse = parse(file.text(), &options_for(path, &options));
        show(&file, &parse.diagnostics, &renderer, true);
        if parse.aborted {
            tracing::warn!(file = %path, "skipped, the record could not be read to the end");
            continue;
        }

        let report = patterns.merge(&parse.tree, merge);
        for error in &report.errors {
            tracing::warn!(file = %path, %error, "not merged");
        }
        if report.records_skipped > 0 {
            let skipped = report.records_skipped;
            tracing::warn!(file = %path, skipped, "only the first game was merged");
        }
        if report.is_clean() {
            merged += 1;
        }
    }

    tracing::info!(files = files.len(), merged, nodes = patterns.tree().len(), "patterns built");
    let text = to_sgf_string(patterns.tree(), &PrintOptions::default())?;
    write_output(output, &text)
}

pub(crate) fn stats(files: &[Utf8PathBuf]) -> anyhow::Result<()> {
    let mut stats = Statistics::new();
    let options = ParseOptions { comments: false, play: false, ..ParseOptions::default() };
    for path in files {
        let file = read(path)?;
        let options = options_for(path, &options);
        let parse = parse_with(file.text(), &options, Goban::default(), Some(&mut stats));
        if parse.diagnostics.has_errors() {
            let errors = parse.diagnostics.errors().count();
            tracing::warn!(file = %path, errors, "read with errors");
        }
    }
    print!("{}", stats.report());
    Ok(())
}

pub(crate) fn properties(verify: bool) -> anyhow::Result<()> {
    let table = PropertyTable::standard();
    if !verify {
        print!("{}", table.render());
        return Ok(());
    }

    let report = PropertyTable::standard_report()?;
    for warning in &report.warnings {
        eprintln!("warning: {warning}");
    }
    table.verify_order()?;
    println!("{report}");
    Ok(())
}
