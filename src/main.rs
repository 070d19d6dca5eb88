// Copyright (c) 2026 REMS contributors.
// Licensed under the MIT license.

//! print-to-pdf CLI
//!
//! Loads an authenticated REMS page headlessly and writes it to a PDF.

use std::env;
use std::process::ExitCode;

use rems_print::{export, ExportParams};
use tracing::{error, info};

#[tokio::main]
async fn main() -> ExitCode {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("rems_print=info".parse().unwrap()),
        )
        .init();

    let args: Vec<String> = env::args().skip(1).collect();

    if args.first().map(String::as_str) == Some("--help")
        || args.first().map(String::as_str) == Some("-h")
    {
        print_usage();
        return ExitCode::SUCCESS;
    }
    if args.first().map(String::as_str) == Some("--version") {
        println!("print-to-pdf {}", env!("CARGO_PKG_VERSION"));
        return ExitCode::SUCCESS;
    }

    let params = match ExportParams::from_args(&args) {
        Ok(p) => p,
        Err(e) => {
            error!("{}", e);
            print_usage();
            return ExitCode::from(2);
        }
    };

    match export(&params).await {
        Ok(summary) => {
            info!(
                requests = summary.requests,
                bytes = summary.pdf_bytes,
                "export complete"
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("export failed: {}", e);
            ExitCode::from(2)
        }
    }
}

fn print_usage() {
    println!(
        r#"print-to-pdf - Render an authenticated REMS page to an A4 PDF

USAGE:
    print-to-pdf <user> <apiKey> <url> <outputFile>

ARGS:
    user        Value sent as the x-rems-user-id header
    apiKey      Value sent as the x-rems-api-key header
    url         Page to load and print
    outputFile  Path of the PDF to write

EXAMPLES:
    print-to-pdf alice deadbeef https://rems.example.com/report/42 report.pdf
"#
    );
}
