use std::env;
use std::fs;
use std::path::Path;
use tide_compiler::config::runtime::RuntimeConfig;
use tide_compiler::logging;
use tide_compiler::pipeline::{self, PipelineError, PipelineOutput, PipelineResult};

#[derive(Debug, Default, PartialEq)]
struct CliOptions {
    source: Option<String>,
    keywords: Option<String>,
    config: Option<String>,
    json: bool,
    tokens: bool,
    help: bool,
}

fn main() {
    let args: Vec<String> = env::args().collect();
    let program_name = args.first().map(String::as_str).unwrap_or("tidec");

    let options = match parse_args(&args[1.min(args.len())..]) {
        Ok(options) => options,
        Err(message) => {
            eprintln!("Error: {}", message);
            eprintln!("Usage: {} [SOURCE] [KEYWORDS] [--json] [--tokens] [--config FILE]", program_name);
            eprintln!("       {} --help", program_name);
            std::process::exit(1);
        }
    };

    if options.help {
        print_help(program_name);
        return;
    }

    let config = match &options.config {
        Some(path) => match RuntimeConfig::load(Path::new(path)) {
            Ok(config) => config,
            Err(error) => {
                eprintln!("Error: {}", error);
                std::process::exit(PipelineError::from(error).exit_code());
            }
        },
        None => RuntimeConfig::default(),
    };

    if let Err(message) = init(&config) {
        eprintln!("Initialization failed: {}", message);
        std::process::exit(1);
    }

    let source_path = options
        .source
        .clone()
        .unwrap_or_else(|| pipeline::DEFAULT_SOURCE_PATH.to_string());
    let keyword_path = resolve_keyword_path(options.keywords.as_deref());

    match pipeline::process_file_with_config(&source_path, keyword_path.as_deref(), &config) {
        Ok(result) => {
            if options.json {
                print_json(&source_path, &result, options.tokens);
            } else {
                print_report(&source_path, &result, options.tokens);
            }
            logging::print_cargo_style_summary();
        }
        Err(error) => {
            eprintln!("\nFAILED: {}", error);
            eprintln!("  stage: {}", error.stage());
            eprintln!("  code:  {}", error.error_code());
            if let Some(rendered) = fs::read_to_string(&source_path)
                .ok()
                .and_then(|source| error.render(&source))
            {
                eprint!("\n{}", rendered);
            }
            logging::print_cargo_style_summary();
            std::process::exit(error.exit_code());
        }
    }
}

fn init(config: &RuntimeConfig) -> Result<(), String> {
    logging::config::init_runtime_preferences(config.logging.clone())?;
    logging::init_global_logging()?;
    pipeline::validate_pipeline()
}

fn parse_args(args: &[String]) -> Result<CliOptions, String> {
    let mut options = CliOptions::default();
    let mut positional = Vec::new();

    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--help" | "-h" => options.help = true,
            "--json" => options.json = true,
            "--tokens" => options.tokens = true,
            "--config" => {
                i += 1;
                let path = args.get(i).ok_or("--config requires a file path")?;
                options.config = Some(path.clone());
            }
            flag if flag.starts_with("--") => {
                return Err(format!("Unknown option '{}'", flag));
            }
            value => positional.push(value.to_string()),
        }
        i += 1;
    }

    if positional.len() > 2 {
        return Err(format!("Unexpected argument '{}'", positional[2]));
    }
    let mut positional = positional.into_iter();
    options.source = positional.next();
    options.keywords = positional.next();

    Ok(options)
}

/// A named keyword file is always read; the default one only if present
fn resolve_keyword_path(named: Option<&str>) -> Option<String> {
    match named {
        Some(path) => Some(path.to_string()),
        None if Path::new(pipeline::DEFAULT_KEYWORD_PATH).is_file() => {
            Some(pipeline::DEFAULT_KEYWORD_PATH.to_string())
        }
        None => None,
    }
}

fn print_json(source_path: &str, result: &PipelineResult, include_tokens: bool) {
    match PipelineOutput::new(source_path, result, include_tokens).to_json() {
        Ok(json) => println!("{}", json),
        Err(error) => {
            eprintln!("Failed to serialize output: {}", error);
            std::process::exit(1);
        }
    }
}

fn print_report(source_path: &str, result: &PipelineResult, include_tokens: bool) {
    println!("Compiling {}", source_path);

    if include_tokens {
        println!("\nTokens:");
        for token in &result.tokens {
            println!("    {}", token);
        }
    }

    let program = &result.program;
    if !program.declarations.is_empty() {
        println!("\nDeclarations:");
        for declaration in &program.declarations {
            match &declaration.initializer {
                Some(init) => println!("    {} {} = {}", declaration.type_name, declaration.name, init),
                None => println!("    {} {}", declaration.type_name, declaration.name),
            }
        }
    }

    println!("\nInstructions:");
    print!("{}", program.listing());

    if !program.labels.is_empty() {
        println!("\nLabels:");
        for (name, index) in program.labels.iter() {
            println!("    {:<20} {}", name, index);
        }
    }

    println!(
        "\nSUCCESS: {} tokens, {} instructions in {:.2}ms",
        result.token_count(),
        program.len(),
        result.timings.total().as_secs_f64() * 1000.0
    );
}

fn print_help(program_name: &str) {
    println!("Tide Compiler v{}", env!("CARGO_PKG_VERSION"));
    println!("Tokenizes a Tide program and lowers it to a jump-based IR");
    println!();
    println!("USAGE:");
    println!("    {} [SOURCE] [KEYWORDS] [options]", program_name);
    println!();
    println!("ARGUMENTS:");
    println!("    SOURCE      Program to compile (default: {})", pipeline::DEFAULT_SOURCE_PATH);
    println!(
        "    KEYWORDS    Whitespace-separated keyword list (default: {}, or built-in keywords if absent)",
        pipeline::DEFAULT_KEYWORD_PATH
    );
    println!();
    println!("OPTIONS:");
    println!("    --json           Print tokens/IR as JSON");
    println!("    --tokens         Include the token stream in the output");
    println!("    --config FILE    Read preferences from a TOML file");
    println!("    --help           Show this help message");
    println!();
    println!("EXIT CODES:");
    println!("    0 success, 1 internal, 2 lexical/indentation, 3 syntax, 4 semantic, 5 IR, 6 file");
    println!();

    let pipeline_info = pipeline::get_pipeline_info();
    println!("PIPELINE:");
    for line in pipeline_info.report().lines() {
        println!("    {}", line);
    }
    println!("    {}", tide_compiler::config::build_info::limits_summary());
}
