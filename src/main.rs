use clap::Parser;
use std::process;
use valsplit::{
    logging, resolve_input, Cli, OutputFormatter, OutputMode, Platform, PromptPathSource,
    UserFriendlyError, ValSplit, ValSplitError,
};

fn main() {
    let exit_code = run();
    process::exit(exit_code);
}

fn run() -> i32 {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Held until exit so buffered log lines are flushed
    let _logger = match logging::init_logging(cli.verbose, cli.quiet) {
        Ok(handle) => Some(handle),
        Err(message) => {
            eprintln!("Warning: logging disabled: {}", message);
            None
        }
    };

    // Handle special commands first
    if cli.generate_config {
        return handle_generate_config(&cli);
    }

    let valsplit = match ValSplit::from_cli(&cli) {
        Ok(valsplit) => valsplit,
        Err(e) => {
            print_startup_error(&e);
            return e.exit_code();
        }
    };

    let input = {
        let mut prompt = PromptPathSource::new(std::io::stdin().lock(), std::io::stderr());
        match resolve_input(cli.input.clone(), &mut prompt) {
            Ok(input) => input,
            Err(e) => {
                valsplit.handle_error(&e);
                return e.exit_code();
            }
        }
    };

    if cli.dry_run {
        return handle_dry_run(&valsplit, &input);
    }

    let mut selector = valsplit.build_selector(Platform::detect(), cli.select.as_deref());

    match valsplit.split(&input, selector.as_mut()) {
        Ok(report) => {
            valsplit.output_formatter().print_run_report(&report);
            0
        }
        Err(e) => {
            valsplit.handle_error(&e);
            e.exit_code()
        }
    }
}

fn handle_generate_config(cli: &Cli) -> i32 {
    let config_path = cli
        .config
        .as_ref()
        .map(|p| p.to_string_lossy().to_string())
        .unwrap_or_else(|| "valsplit.toml".to_string());

    match ValSplit::generate_sample_config(&config_path) {
        Ok(()) => {
            println!("Generated sample configuration file: {}", config_path);
            println!("\nTo use this configuration:");
            println!("  valsplit <export.json> --config {}", config_path);
            println!("\nEdit the file to customize settings for your needs.");
            0
        }
        Err(e) => {
            eprintln!("Failed to generate configuration file: {}", e.user_message());
            if let Some(suggestion) = e.suggestion() {
                eprintln!("Suggestion: {}", suggestion);
            }
            1
        }
    }
}

fn handle_dry_run(valsplit: &ValSplit, input: &std::path::Path) -> i32 {
    match valsplit.dry_run(input) {
        Ok(report) => {
            valsplit.output_formatter().print_dry_run(&report);
            0
        }
        Err(e) => {
            valsplit.handle_error(&e);
            e.exit_code()
        }
    }
}

fn print_startup_error(error: &ValSplitError) {
    let formatter = OutputFormatter::new(OutputMode::Human, 0, false);
    formatter.print_user_friendly_error(error);
}
