//! variable-diff - 特性开关变量差异分析工具
//!
//! 读取统一 diff，扫描新增和删除的特性开关变量调用点，
//! 把按解析器分组的结果以 JSON 输出到标准输出。

mod cli;

use cli::{Cli, Config};
use std::io::Read;
use tracing::{debug, error, info};
use tracing_subscriber::EnvFilter;
use variable_diff_core::{Result, Scanner, VariableDiffError, parse_diff};

fn main() {
    // 解析命令行参数
    let cli = Cli::parse_args();

    // 初始化日志记录，日志写到 stderr，stdout 只输出 JSON
    init_tracing(cli.verbose);

    // 验证参数
    if let Err(e) = cli.validate() {
        error!("Invalid arguments: {}", e);
        std::process::exit(1);
    }

    let config = match cli.into_config() {
        Ok(config) => config,
        Err(e) => {
            error!("Invalid configuration: {}", e);
            std::process::exit(1);
        }
    };

    debug!(
        "Configuration: diff_file={:?}, client_names={:?}, custom extensions={:?}",
        config.diff_file,
        config.options.client_names,
        config.options.match_patterns.keys().collect::<Vec<_>>()
    );

    if let Err(e) = run(config) {
        error!("Application error: {}", e);
        std::process::exit(1);
    }
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// 主要应用逻辑
fn run(config: Config) -> Result<()> {
    let diff = read_diff(&config)?;
    let files = parse_diff(&diff)?;
    info!("Parsed {} files from diff", files.len());

    let scanner = Scanner::new(&config.options)?;
    let report = scanner.scan_with_stats(&files);

    let json = if config.compact {
        serde_json::to_string(&report.results)
    } else {
        serde_json::to_string_pretty(&report.results)
    }
    .map_err(|e| VariableDiffError::ConfigError(format!("Failed to serialize results: {e}")))?;

    match &config.output_file {
        Some(path) => {
            std::fs::write(path, format!("{json}\n"))?;
            info!("Results written to {}", path.display());
        }
        None => println!("{json}"),
    }

    Ok(())
}

/// 读取 diff 文本，没有文件时读标准输入
fn read_diff(config: &Config) -> Result<String> {
    match &config.diff_file {
        Some(path) => {
            debug!("Reading diff from {}", path.display());
            Ok(std::fs::read_to_string(path)?)
        }
        None => {
            debug!("Reading diff from stdin");
            let mut diff = String::new();
            std::io::stdin().read_to_string(&mut diff)?;
            Ok(diff)
        }
    }
}
