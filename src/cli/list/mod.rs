//! List command - prints the sequences in the catalog

use std::process::ExitCode;

use crate::demo;

pub fn run() -> anyhow::Result<ExitCode> {
    let catalog = demo::catalog();
    let default = catalog.default_name();

    for name in catalog.names() {
        let cases = catalog.build(Some(name))?.len();
        let marker = if Some(name) == default { " (default)" } else { "" };
        println!("{:<10} {:>2} cases{}", name, cases, marker);
    }

    Ok(ExitCode::SUCCESS)
}
