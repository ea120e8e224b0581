use anyhow::{Error, Result};
use clap::Parser;
use std::io::{self, Write};
use std::process::ExitCode;

use ipscrape::{html, input, output, pipeline};

/// Check if the error chain contains a broken pipe error.
#[inline(always)]
fn is_broken_pipe(err: &Error) -> bool {
    // Look for a broken pipe error in the error chain
    for cause in err.chain() {
        if let Some(io_err) = cause.downcast_ref::<io::Error>() {
            if io_err.kind() == io::ErrorKind::BrokenPipe {
                return true;
            }
        }
    }
    false
}

#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
struct Args {
    /// URL to scrape, must be FQDN ie https://example.com
    #[clap(value_name = "URL", value_parser = input::parse_url_arg)]
    url: String,
}

fn main() -> ExitCode {
    // Use a separate run function to handle the actual work
    let err = match run_main() {
        Ok(code) => return code,
        Err(err) => err,
    };

    // Handle broken pipe errors gracefully
    if is_broken_pipe(&err) {
        return ExitCode::SUCCESS;
    }

    // Print detailed error information based on environment variables
    if std::env::var("RUST_BACKTRACE").is_ok_and(|v| v == "1")
        && std::env::var("RUST_LIB_BACKTRACE").map_or(true, |v| v == "1")
    {
        writeln!(&mut std::io::stderr(), "{:?}", err).unwrap();
    } else {
        writeln!(&mut std::io::stderr(), "{:#}", err).unwrap();
    }

    ExitCode::FAILURE
}

fn run_main() -> Result<ExitCode> {
    let args = Args::parse();

    // Fetch and render happen once, before any extraction.
    let page = input::fetch_page(&args.url)?;
    let text = html::page_text(&page);

    // The two pipelines are independent; the report order is fixed.
    let v4 = pipeline::extract_ipv4(&text);
    let v6 = pipeline::extract_ipv6(&text);

    let mut out = io::BufWriter::with_capacity(65536, io::stdout());
    output::write_report(&mut out, &v4, &v6, &args.url)?;
    out.flush()?;

    Ok(ExitCode::SUCCESS)
}
