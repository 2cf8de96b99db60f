//! Web 服务器主程序入口

use polyfaq::config::WebConfig;
use polyfaq::env::EnvVar;
use polyfaq::web::WebServer;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv::dotenv().ok();

    // 初始化日志：RUST_LOG 优先，其次是 POLYFAQ_LOG_LEVEL
    let level = polyfaq::env::core::LogLevel::get()?;
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    // 解析命令行参数
    let args: Vec<String> = std::env::args().collect();

    let mut bind_override: Option<String> = None;
    let mut port_override: Option<u16> = None;

    // 简单的命令行参数解析
    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--bind" | "-b" => {
                if i + 1 < args.len() {
                    bind_override = Some(args[i + 1].clone());
                    i += 2;
                } else {
                    eprintln!("Error: --bind requires an address");
                    std::process::exit(1);
                }
            }
            "--port" | "-p" => {
                if i + 1 < args.len() {
                    let parsed = args[i + 1].parse().unwrap_or_else(|_| {
                        eprintln!("Error: Invalid port number");
                        std::process::exit(1);
                    });
                    port_override = Some(parsed);
                    i += 2;
                } else {
                    eprintln!("Error: --port requires a port number");
                    std::process::exit(1);
                }
            }
            "--help" | "-h" => {
                print_help();
                return Ok(());
            }
            _ => {
                eprintln!("Error: Unknown argument: {}", args[i]);
                print_help();
                std::process::exit(1);
            }
        }
    }

    // 环境变量为基础配置，命令行参数覆盖监听地址
    let mut config = WebConfig::from_env()?;
    if let Some(bind_addr) = bind_override {
        config.bind_addr = bind_addr;
    }
    if let Some(port) = port_override {
        config.port = port;
    }
    config.validate()?;

    let server = WebServer::new(config);
    server.start().await?;

    Ok(())
}

fn print_help() {
    println!("PolyFAQ Web Server");
    println!();
    println!("USAGE:");
    println!("    polyfaq-web [OPTIONS]");
    println!();
    println!("OPTIONS:");
    println!("    -b, --bind <ADDRESS>     Bind address [default: 127.0.0.1]");
    println!("    -p, --port <PORT>        Port number [default: 3000]");
    println!("    -h, --help               Print help information");
    println!();
    println!("ENVIRONMENT:");
    println!("    MONGODB_URL                  MongoDB connection string");
    println!("    REDIS_URL                    Redis connection string");
    println!("    POLYFAQ_TRANSLATION_API_URL  DeepLX-compatible translation API");
    println!("    POLYFAQ_TARGET_LANGS         Languages kept in sync (default: hi,bn)");
    println!("    POLYFAQ_LOG_LEVEL            Log level (default: info)");
    println!();
    println!("EXAMPLES:");
    println!("    polyfaq-web");
    println!("    polyfaq-web --bind 0.0.0.0 --port 3000");
}
