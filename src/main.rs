use actix_web::{get, middleware, web, App, HttpResponse, HttpServer, Responder};
use actix_web_httpauth::middleware::HttpAuthentication;
use actix_web_opentelemetry::{PrometheusMetricsHandler, RequestMetrics, RequestTracing};
use chrono::Utc;
use clap::Parser;
use opentelemetry::global;
use opentelemetry_sdk::metrics::MeterProvider;
use std::io::Read;

use easytime::{
    errors, handlers, serve_static_file, shift::ShiftSpec, timeinfo::TimeInfo, timeparse, timezone,
};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Subcommand)]
enum Commands {
    /// Parse a time string or Unix timestamp and print it normalized
    Parse {
        /// The input to parse; the current time when omitted
        input: Option<String>,

        #[command(flatten)]
        options: OutputOptions,
    },
    /// Print the current time
    Now {
        #[command(flatten)]
        options: OutputOptions,
    },
    /// Run the web converter
    Web {
        /// Port to listen on
        #[arg(long, default_value_t = 8080)]
        port: u16,
    },
}

#[derive(clap::Args)]
struct OutputOptions {
    /// Timezone for interpreting naive input and displaying the result
    #[arg(long, default_value = "Local")]
    timezone: String,

    /// Shift the parsed time, e.g. --shift +1d --shift -3h30m
    #[arg(long)]
    shift: Vec<String>,

    /// Print the full record as JSON instead of a single ISO 8601 line
    #[arg(long)]
    json: bool,
}

fn run_convert(input: Option<&str>, options: &OutputOptions) -> errors::Result<()> {
    let tz = timezone::resolve(&options.timezone)?;
    let now = Utc::now();

    let instant = match input {
        Some(raw) => timeparse::parse(raw, now.with_timezone(&tz), tz)?,
        None => now,
    };

    let shift = options
        .shift
        .iter()
        .map(|expr| ShiftSpec::parse(expr))
        .try_fold(ShiftSpec::default(), |acc, spec| spec.map(|s| acc.combine(s)))?;
    let instant = if shift.is_zero() {
        instant
    } else {
        shift.apply(instant, tz)?
    };

    let info = TimeInfo::project(instant, tz)?;
    if options.json {
        println!("{}", serde_json::to_string_pretty(&info)?);
    } else {
        println!("{}", info.iso8601);
    }

    Ok(())
}

#[get("/healthz")]
async fn healthz_handler() -> impl Responder {
    "OK"
}

async fn serve(port: u16) -> errors::Result<()> {
    let registry = prometheus::Registry::new();
    let exporter = opentelemetry_prometheus::exporter()
        .with_registry(registry.clone())
        .build()
        .unwrap();
    let provider = MeterProvider::builder().with_reader(exporter).build();
    global::set_meter_provider(provider);

    let listen_address = std::env::var("LISTEN_ADDRESS").unwrap_or("127.0.0.1".to_owned());

    log::info!("Starting HTTP server at http://{}:{}", listen_address, port);

    HttpServer::new(move || {
        let auth = HttpAuthentication::with_fn(handlers::validator);

        App::new()
            .wrap(auth)
            .wrap(RequestTracing::new())
            .wrap(RequestMetrics::default())
            .route(
                "/api/metrics",
                web::get().to(PrometheusMetricsHandler::new(registry.clone())),
            )
            .wrap(middleware::Logger::default())
            .service(serve_static_file!("styles.css"))
            .service(serve_static_file!("app.js"))
            .service(healthz_handler)
            .service(
                web::resource("/api/convert").route(web::route().to(handlers::convert_handler)),
            )
            .service(web::resource("/api/now").route(web::route().to(handlers::now_handler)))
            .default_service(web::route().to(handlers::page_handler))
    })
    .bind((listen_address, port))?
    .run()
    .await?;

    Ok(())
}

async fn run() -> errors::Result<()> {
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let cli = Cli::parse();

    match &cli.command {
        Commands::Parse { input, options } => run_convert(input.as_deref(), options),
        Commands::Now { options } => run_convert(None, options),
        Commands::Web { port } => serve(*port).await,
    }
}

#[actix_web::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("{}", e);
        ::std::process::exit(1);
    }
}
