use std::io::Read;
use std::sync::Arc;

use opentelemetry_tide::OpenTelemetryTracingMiddleware;
use structopt::StructOpt;

pub mod backend;
pub mod models;
pub mod telemetry;
pub mod web;

#[derive(Clone, Debug)]
pub struct State {
    pub args: Arc<Args>,
    pub backend: backend::Client,
    pub tera: Arc<tera::Tera>,
    pub cache_busting_string: Option<String>,
}

#[derive(Debug)]
pub enum Error {
    TemplateParseError(tera::Error),
    TelemetryInitError(anyhow::Error),
    StaticDirError(std::io::Error),
}

impl From<Error> for i32 {
    fn from(error: Error) -> i32 {
        match error {
            Error::TemplateParseError(_) => 3,
            Error::TelemetryInitError(_) => 4,
            Error::StaticDirError(_) => 5,
        }
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::TemplateParseError(err) => {
                write!(f, "Template parsing error: {}", err)
            },
            Error::TelemetryInitError(err) => {
                write!(f, "Failed to init telemetry: {}", err)
            },
            Error::StaticDirError(err) => {
                write!(f, "Failed to serve static directory: {}", err)
            },
        }
    }
}

#[derive(Debug, StructOpt)]
pub struct Args {
    /// Host address to bind to.
    #[structopt(long, default_value = "localhost", env = "SILVER_HALIDE_BIND_ADDRESS")]
    address: String,
    /// Port to bind to.
    #[structopt(long, default_value = "8808", env = "SILVER_HALIDE_BIND_PORT")]
    port: u16,

    /// Base URL of the headless record backend.
    #[structopt(
        long,
        default_value = "http://localhost:8090",
        env = "SILVER_HALIDE_BACKEND_URL"
    )]
    backend_url: String,

    /// Public base URL of the site, used for canonical links and the sitemap.
    #[structopt(long, env = "SILVER_HALIDE_BASE_URL")]
    base_url: String,

    /// Number of preview photos per sub-gallery on parent gallery pages.
    #[structopt(
        long,
        default_value = "2",
        env = "SILVER_HALIDE_PREVIEW_PHOTOS_PER_GALLERY"
    )]
    preview_photos_per_gallery: u8,

    /// Number of featured photos shown in the home page carousel.
    #[structopt(long, default_value = "10", env = "SILVER_HALIDE_HERO_PHOTO_COUNT")]
    hero_photo_count: u8,

    /// Path to Tera templates directory.
    #[structopt(
        long,
        parse(from_os_str),
        default_value = "./templates",
        env = "SILVER_HALIDE_TEMPLATE_PATH"
    )]
    template_path: std::path::PathBuf,

    /// Path to the static assets directory.
    #[structopt(
        long,
        parse(from_os_str),
        default_value = "./static",
        env = "SILVER_HALIDE_STATIC_PATH"
    )]
    static_path: std::path::PathBuf,
}

pub async fn main() -> Result<(), Error> {
    dotenv::dotenv().ok();
    let args = Arc::new(Args::from_args());

    telemetry::init().map_err(Error::TelemetryInitError)?;

    let backend = backend::Client::new(&args.backend_url);

    let template_path = args
        .template_path
        .canonicalize()
        .expect("could not canonicalize template path");
    let tera = match tera::Tera::new(&template_path.join("**/*.html").to_string_lossy()) {
        Ok(t) => t,
        Err(e) => {
            return Err(Error::TemplateParseError(e));
        },
    };

    let cache_busting_string = match std::fs::File::open(template_path.join("cache-buster")) {
        Ok(mut file) => {
            let mut data = String::new();
            file.read_to_string(&mut data)
                .expect("couldn't read cache busting string from file");
            data.split_whitespace().next().map(|s| s.to_string())
        },
        Err(_) => None,
    };

    let state = State {
        args: args.clone(),
        backend,
        tera: Arc::new(tera),
        cache_busting_string,
    };
    let mut app = tide::with_state(state);

    let tracer = opentelemetry::global::tracer("silver-halide");
    app.with(OpenTelemetryTracingMiddleware::new(tracer));

    web::mount(&mut app);
    app.at("/static")
        .serve_dir(&args.static_path)
        .map_err(Error::StaticDirError)?;

    let address: &str = args.address.as_ref();
    app.listen((address, args.port))
        .await
        .expect("starting tide app failed");

    Ok(())
}
