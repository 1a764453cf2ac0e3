//! Command-line entry point for the contract-extension scanner.

use anyhow::Context;
use clap::Parser;
use clausecrawl::{runtime, Cli, ExportOptions, PageOutcome, RunReport};
use tokio::runtime::Builder;
use url::Url;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let page_url = Url::parse(&cli.url).context("invalid page URL")?;
    let controls = cli.build_controls();
    let export = cli.export_options();

    let rt = Builder::new_current_thread()
        .enable_all()
        .build()
        .context("build tokio runtime")?;
    let report = rt.block_on(runtime::run(&controls, &page_url));

    if cli.json {
        println!("{}", report.to_json().context("serialize report")?);
    } else {
        print_table(&report, &export);
    }

    if let Some(path) = &cli.csv {
        std::fs::write(path, report.to_csv(&export))
            .with_context(|| format!("write CSV to {}", path.display()))?;
        eprintln!("csv written to {}", path.display());
    }

    Ok(())
}

fn print_table(report: &RunReport, export: &ExportOptions) {
    match report.outcome {
        PageOutcome::RenderFailed => {
            let detail = report.render_error.as_deref().unwrap_or("unknown error");
            println!("{}: render failed ({detail})", report.page_url);
            return;
        }
        PageOutcome::NoDocuments => {
            println!("{}: no PDF documents found", report.page_url);
            return;
        }
        PageOutcome::Scanned => {}
    }

    for result in &report.results {
        println!(
            "{}\t{}\t{}",
            result.url,
            result.status.as_str(),
            export.matches_cell(result)
        );
    }
}
