use crate::config::RuntimeConfig;
use crate::dispatcher::{resolve_handler, HandlerRegistry};
use crate::handlers::builtin_registry;
use crate::server::{AppService, HttpServer};
use crate::spec::{load_spec, RouteMeta, SpecError};
use crate::validator::{print_issues, RequestValidator, ValidationIssue};
use anyhow::Context;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

/// Command-line interface for oasgate
#[derive(Parser)]
#[command(name = "oasgate", version)]
#[command(about = "Serve an API description with request validation", long_about = None)]
pub struct Cli {
    /// The subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Serve every operation of a description document
    Serve {
        /// Path to the description document (YAML or JSON)
        #[arg(short, long)]
        spec: PathBuf,

        /// Port to listen on
        #[arg(short, long, env = "PORT", default_value_t = 8080)]
        port: u16,

        /// Address to bind
        #[arg(long, default_value = "0.0.0.0")]
        host: String,

        /// Do not answer preflights or add CORS headers
        #[arg(long, default_value_t = false)]
        no_cors: bool,
    },
    /// Print the effective routes and where their handlers come from
    Routes {
        /// Path to the description document (YAML or JSON)
        #[arg(short, long)]
        spec: PathBuf,
    },
    /// Load and compile a document without serving it
    Check {
        /// Path to the description document (YAML or JSON)
        #[arg(short, long)]
        spec: PathBuf,
    },
}

/// Parse the process arguments and run the command with the bundled handlers.
pub fn run_cli() -> anyhow::Result<()> {
    let cli = Cli::parse();
    run_command(&cli.command, &builtin_registry())
}

/// # Errors
///
/// Document errors, a failed bind, or a server that stops abnormally.
pub fn run_command(command: &Commands, registry: &HandlerRegistry) -> anyhow::Result<()> {
    match command {
        Commands::Serve {
            spec,
            port,
            host,
            no_cors,
        } => {
            let routes = load_or_report(spec)?;
            RuntimeConfig::from_env().apply();
            let service = AppService::from_routes(routes, registry, !*no_cors)
                .context("failed to start handler coroutines")?;
            let addr = format!("{host}:{port}");
            let handle = HttpServer(service)
                .start(addr.as_str())
                .with_context(|| format!("failed to bind {addr}"))?;
            handle
                .join()
                .map_err(|e| anyhow::anyhow!("server stopped abnormally: {e:?}"))
        }
        Commands::Routes { spec } => {
            let routes = load_or_report(spec)?;
            print!("{}", format_routes(&routes, registry));
            Ok(())
        }
        Commands::Check { spec } => {
            let routes = load_or_report(spec)?;
            let gated = routes
                .iter()
                .map(|r| RequestValidator::for_operation(&r.operation))
                .filter(|v| !v.is_noop())
                .count();
            println!(
                "✅ {} route(s), {} with request validation",
                routes.len(),
                gated
            );
            Ok(())
        }
    }
}

/// Load a document, printing document errors as an issue block.
fn load_or_report(spec: &Path) -> anyhow::Result<Vec<RouteMeta>> {
    match load_spec(spec) {
        Ok((_, routes)) => Ok(routes),
        Err(err) => {
            if let Some(spec_err) = err.downcast_ref::<SpecError>() {
                print_issues(&[ValidationIssue::from(spec_err)]);
            }
            Err(err)
        }
    }
}

/// One line per route: verb, effective route, handler key, handler source.
pub fn format_routes(routes: &[RouteMeta], registry: &HandlerRegistry) -> String {
    let mut out = format!("[routes] count={}\n", routes.len());
    for route in routes {
        let (_, source) = resolve_handler(registry, route);
        out.push_str(&format!(
            "[route] {:<7} {} -> {} ({:?})\n",
            route.verb.method().as_str(),
            route.route,
            route.handler_key,
            source
        ));
    }
    out
}
