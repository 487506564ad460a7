//! 命令行接口模块
//!
//! 提供命令行参数解析，以及配置文件和命令行选项的合并

use clap::Parser;
use std::path::PathBuf;
use variable_diff_core::{ParseOptions, Result, VariableDiffError};

/// variable-diff - 特性开关变量差异分析工具
///
/// 读取统一 diff，找出新增和删除的特性开关变量调用点，以 JSON 输出。
#[derive(Parser, Debug)]
#[command(name = "variable-diff")]
#[command(author = "variable-diff contributors")]
#[command(version = "0.1.0")]
#[command(about = "Find feature-flag variable usages added or removed in a unified diff")]
#[command(
    long_about = "variable-diff reads a unified diff and reports every feature-flag variable usage that was added or removed, grouped by the language parser or custom pattern that found it. Results are printed as JSON on stdout; logs go to stderr."
)]
pub struct Cli {
    /// diff 文件路径，省略或 `-` 时从标准输入读取
    #[arg(
        help = "Unified diff to scan; reads stdin when omitted or `-`",
        value_name = "DIFF_FILE"
    )]
    pub diff_file: Option<PathBuf>,

    /// JSON 配置文件
    #[arg(
        short = 'c',
        long = "config",
        value_name = "FILE",
        help = "JSON options file with clientNames, matchPatterns and variableAliases"
    )]
    pub config_file: Option<PathBuf>,

    /// 额外的客户端变量名
    #[arg(
        long = "client-name",
        value_name = "NAME",
        help = "Additional SDK client variable name (repeatable)"
    )]
    pub client_names: Vec<String>,

    /// 自定义匹配模式
    #[arg(
        long = "match-pattern",
        value_name = "EXT=REGEX",
        value_parser = parse_key_value,
        help = "Custom pattern for a file extension; the first capture group is the variable name (repeatable)"
    )]
    pub match_patterns: Vec<(String, String)>,

    /// 变量别名
    #[arg(
        long = "var-alias",
        value_name = "RAW=NAME",
        value_parser = parse_key_value,
        help = "Map a raw token such as VARIABLES.FOO to a variable name (repeatable)"
    )]
    pub variable_aliases: Vec<(String, String)>,

    /// 输出到文件
    #[arg(
        short = 'o',
        long = "output",
        value_name = "FILE",
        help = "Write output to a file instead of stdout"
    )]
    pub output_file: Option<PathBuf>,

    /// 紧凑 JSON
    #[arg(long = "compact", help = "Print compact JSON instead of pretty JSON")]
    pub compact: bool,

    /// 详细输出
    #[arg(short = 'v', long = "verbose", help = "Enable verbose logging output")]
    pub verbose: bool,
}

/// 应用程序配置信息
#[derive(Debug, Clone)]
pub struct Config {
    /// diff 来源，`None` 表示标准输入
    pub diff_file: Option<PathBuf>,
    /// 合并后的扫描选项
    pub options: ParseOptions,
    pub output_file: Option<PathBuf>,
    pub compact: bool,
    pub verbose: bool,
}

impl Cli {
    /// 解析命令行参数
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// 验证参数的有效性
    pub fn validate(&self) -> Result<()> {
        if let Some(diff_file) = self.diff_input() {
            if !diff_file.is_file() {
                return Err(VariableDiffError::IoError(std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    format!("Diff file does not exist: {}", diff_file.display()),
                )));
            }
        }

        if let Some(config_file) = &self.config_file {
            if !config_file.is_file() {
                return Err(VariableDiffError::IoError(std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    format!("Config file does not exist: {}", config_file.display()),
                )));
            }
        }

        // 验证并创建输出文件路径 (如果指定)
        if let Some(output_file) = &self.output_file {
            if let Some(parent) = output_file.parent() {
                if !parent.as_os_str().is_empty() && !parent.exists() {
                    std::fs::create_dir_all(parent).map_err(|e| {
                        VariableDiffError::IoError(std::io::Error::new(
                            e.kind(),
                            format!(
                                "Failed to create output directory {}: {}",
                                parent.display(),
                                e
                            ),
                        ))
                    })?;
                }
            }
        }

        Ok(())
    }

    /// diff 文件路径，`-` 视为标准输入
    fn diff_input(&self) -> Option<&PathBuf> {
        self.diff_file
            .as_ref()
            .filter(|path| path.as_os_str() != "-")
    }

    /// 命令行上给出的扫描选项
    fn flag_options(&self) -> ParseOptions {
        let mut options = ParseOptions::new().with_client_names(self.client_names.iter().cloned());
        for (extension, pattern) in &self.match_patterns {
            options = options.with_match_pattern(extension.as_str(), pattern.as_str());
        }
        for (token, name) in &self.variable_aliases {
            options = options.with_variable_alias(token.as_str(), name.as_str());
        }
        options
    }

    /// 读取配置文件并合并命令行选项，命令行优先
    pub fn into_config(self) -> Result<Config> {
        let file_options = match &self.config_file {
            Some(path) => load_options(path)?,
            None => ParseOptions::default(),
        };
        let options = file_options.merge(self.flag_options());

        Ok(Config {
            diff_file: self.diff_input().cloned(),
            options,
            output_file: self.output_file,
            compact: self.compact,
            verbose: self.verbose,
        })
    }
}

/// 从 JSON 文件加载扫描选项
pub fn load_options(path: &PathBuf) -> Result<ParseOptions> {
    let content = std::fs::read_to_string(path)?;
    serde_json::from_str(&content).map_err(|e| {
        VariableDiffError::ConfigError(format!(
            "Failed to parse config file {}: {}",
            path.display(),
            e
        ))
    })
}

/// 解析 `KEY=VALUE`，值中可以包含 `=`
fn parse_key_value(raw: &str) -> std::result::Result<(String, String), String> {
    match raw.split_once('=') {
        Some((key, value)) if !key.trim().is_empty() => {
            Ok((key.trim().to_string(), value.to_string()))
        }
        _ => Err(format!("expected KEY=VALUE, got `{raw}`")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_key_value() {
        assert_eq!(
            parse_key_value(r"js=checkVariable\((\w+)=").expect("valid"),
            ("js".to_string(), r"checkVariable\((\w+)=".to_string())
        );
        assert!(parse_key_value("no-separator").is_err());
        assert!(parse_key_value("=value").is_err());
    }

    #[test]
    fn test_flags_build_options() {
        let cli = Cli::try_parse_from([
            "variable-diff",
            "-",
            "--client-name",
            "flags",
            "--match-pattern",
            "yaml=flag: (\\w+)",
            "--var-alias",
            "VARIABLES.FOO=foo",
            "--compact",
        ])
        .expect("arguments should parse");

        let config = cli.into_config().expect("config");
        assert_eq!(config.diff_file, None);
        assert!(config.compact);
        assert_eq!(config.options.client_names, vec!["flags"]);
        assert_eq!(config.options.match_patterns["yaml"], vec!["flag: (\\w+)"]);
        assert_eq!(config.options.variable_aliases["VARIABLES.FOO"], "foo");
    }
}
