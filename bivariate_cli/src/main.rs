use bivariate_cli::{Output, Session};
use bivariate_engine::output::export_anydice_format;
use miette::IntoDiagnostic;
use tracing_subscriber::EnvFilter;

fn main() -> miette::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let mut session = Session::new();

    // Arguments on the command line run a single command.
    let args = std::env::args().skip(1).collect::<Vec<_>>();
    if !args.is_empty() {
        let line = args.join(" ");
        return match session.execute(&line) {
            Ok(outputs) => {
                print_outputs(outputs);
                Ok(())
            }
            Err(e) => Err(miette::Report::new(e).with_source_code(line)),
        };
    }

    let mut rl = rustyline::DefaultEditor::new().into_diagnostic()?;
    while let Ok(line) = rl.readline("> ") {
        if line.trim().is_empty() {
            continue;
        }
        let _ = rl.add_history_entry(line.as_str());
        match session.execute(&line) {
            Ok(outputs) => print_outputs(outputs),
            Err(e) => eprintln!("{:?}", miette::Report::new(e).with_source_code(line)),
        }
    }
    Ok(())
}

fn print_outputs(outputs: Vec<Output>) {
    let terminal_width = crossterm::terminal::size().map(|(w, _)| w).unwrap_or(80);
    for output in outputs {
        match output {
            Output::Distribution { name, distribution } => {
                println!("{}", export_anydice_format(&name, &distribution))
            }
            Output::Table(table) => print!("{}", table.render(terminal_width)),
            Output::Text(text) => println!("{}", text),
        }
    }
}
