use clap::{Parser, Subcommand};
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE, COOKIE, SET_COOKIE};
use reqwest::Method;
use serde_json::Value;

#[derive(Parser)]
#[command(name = "session-proxy-cli")]
#[command(about = "Probe a running session proxy", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "http://localhost:3000")]
    url: String,

    /// Cookie header to send, e.g. "access_token=...; refresh_token=..."
    #[arg(short, long)]
    cookie: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch the current session (GET /api/me)
    Me,
    /// Check proxy liveness
    Health,
    /// Call any relay route
    Call {
        /// HTTP method
        method: String,
        /// Inbound path, e.g. /api/auth/login
        path: String,
        /// JSON body to send
        #[arg(short, long)]
        data: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .build()?;

    let mut headers = HeaderMap::new();
    if let Some(cookie) = &cli.cookie {
        headers.insert(COOKIE, HeaderValue::from_str(cookie)?);
    }

    let base = cli.url.trim_end_matches('/');
    let request = match cli.command {
        Commands::Me => client.get(format!("{}/api/me", base)).headers(headers),
        Commands::Health => client.get(format!("{}/healthz", base)),
        Commands::Call { method, path, data } => {
            let method: Method = method.to_uppercase().parse()?;
            let mut request = client.request(method, format!("{}{}", base, path)).headers(headers);
            if let Some(data) = data {
                // Reject malformed JSON before it reaches the proxy
                serde_json::from_str::<Value>(&data)?;
                request = request.header(CONTENT_TYPE, "application/json").body(data);
            }
            request
        }
    };

    print_response(request.send().await?).await
}

async fn print_response(res: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    let status = res.status();
    println!("Status: {}", status);
    for cookie in res.headers().get_all(SET_COOKIE) {
        println!("Set-Cookie: {}", String::from_utf8_lossy(cookie.as_bytes()));
    }

    let text = res.text().await?;
    match serde_json::from_str::<Value>(&text) {
        Ok(json) => println!("{}", serde_json::to_string_pretty(&json)?),
        Err(_) => println!("{}", text),
    }
    if !status.is_success() {
        eprintln!("Error: proxy returned status {}", status);
    }
    Ok(())
}
