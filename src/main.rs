use actix_files as fs;
use actix_web::{get, middleware::Logger, web, App, HttpResponse, HttpServer, Result as ActixResult};
use clap::Parser;
use docportal::config::DEFAULT_API_BASE_URL;
use docportal::ClientConfig;

#[derive(Parser, Debug)]
#[command(author, version, about = "Serves the document portal web client", long_about = None)]
struct Args {
    /// Address to listen on
    #[arg(long, default_value = "127.0.0.1:8080")]
    bind: String,

    /// Base URL of the portal REST API
    #[arg(long, default_value = DEFAULT_API_BASE_URL)]
    api_base_url: String,

    /// Directory holding the built WASM bundle
    #[arg(long, default_value = "./pkg")]
    pkg_dir: String,

    /// Enable debug mode
    #[arg(long)]
    debug: bool,
}

impl Args {
    fn client_config(&self) -> ClientConfig {
        ClientConfig {
            api_base_url: self.api_base_url.clone(),
            debug_mode: self.debug,
        }
    }
}

// Serve the main HTML page
#[get("/")]
async fn index() -> ActixResult<HttpResponse> {
    index_page()
}

fn index_page() -> ActixResult<HttpResponse> {
    let html = include_str!("../static/index.html");
    Ok(HttpResponse::Ok().content_type("text/html").body(html))
}

// Target of the email verification link; the bundle reads `?token=` itself
#[get("/verify")]
async fn verify_link() -> ActixResult<HttpResponse> {
    index_page()
}

// Client configuration, fetched by the bundle at boot
#[get("/config")]
async fn client_config(config: web::Data<ClientConfig>) -> ActixResult<HttpResponse> {
    Ok(HttpResponse::Ok().json(config.get_ref()))
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    let args = Args::parse();

    env_logger::init();

    let config = args.client_config();
    log::info!("serving web client at http://{}", args.bind);
    log::info!("portal API: {}", config.api_base_url);
    log::info!("bundle directory: {}", args.pkg_dir);
    if config.debug_mode {
        log::info!("debug mode enabled");
    }

    let config = web::Data::new(config);
    let pkg_dir = args.pkg_dir.clone();

    HttpServer::new(move || {
        App::new()
            .app_data(config.clone())
            .wrap(Logger::default())
            .service(index)
            .service(verify_link)
            .service(client_config)
            .service(fs::Files::new("/pkg", pkg_dir.clone()))
    })
    .bind(&args.bind)?
    .run()
    .await
}
