/*a Copyright

Licensed under the Apache License, Version 2.0 (the "License");
you may not use this file except in compliance with the License.
You may obtain a copy of the License at

  http://www.apache.org/licenses/LICENSE-2.0

Unless required by applicable law or agreed to in writing, software
distributed under the License is distributed on an "AS IS" BASIS,
WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
See the License for the specific language governing permissions and
limitations under the License.

@file    main.rs
@brief   Command-line front-end: load, route, optimize, size, render
 */

//a Imports
use clap::Parser;
use orthogram::render::svg::SvgRenderer;
use orthogram::Diagram;
use std::path::PathBuf;
use std::process::ExitCode;

//a Cli
//tp Cli
/// Render an orthogonal block diagram to SVG
#[derive(Parser, Debug)]
#[command(name = "orthogram", version, about)]
struct Cli {
    /// Diagram definition file (YAML, JSON or grid notation)
    input: PathBuf,

    /// Output SVG file; defaults to the input path with its extension
    /// replaced by `.svg`
    #[arg(short, long)]
    output: Option<PathBuf>,
}

//a main
//fp main
fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();
    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{e}");
            ExitCode::FAILURE
        }
    }
}

//fp run
fn run(cli: &Cli) -> orthogram::Result<()> {
    let output = cli.output.clone().unwrap_or_else(|| cli.input.with_extension("svg"));

    log::info!("loading {}", cli.input.display());
    let mut diagram = Diagram::load(&cli.input)?;

    log::info!("routing connections");
    diagram.route()?;

    log::info!("optimizing segments");
    diagram.optimize();

    log::info!("sizing layout");
    diagram.size()?;

    log::info!("rendering to {}", output.display());
    let mut renderer = SvgRenderer::new();
    diagram.render(&mut renderer, &output)?;

    Ok(())
}
