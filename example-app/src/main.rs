//! # 示例应用程序
//!
//! 两个服务、一个主组件：`SecondService` 有 `default` 和 `cloud` 两个变体，
//! 主组件总是以 `default` 标签解析。

mod services;

use clap::Parser;
use di_abstractions::{Implements, Main, Ref};
use di_common::{init_logging, LoggingConfig, ResolverOptions};
use di_impl::{global_registry, run, Registry};
use services::{FirstService, SecondService};
use std::path::PathBuf;
use tracing::{error, info};

/// 命令行参数
#[derive(Parser, Debug)]
#[command(name = "example-app")]
#[command(about = "组件注册与变体解析示例")]
struct Args {
    /// 解析器配置文件路径，未指定时只读取 DI_ 环境变量
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// 额外演示解析的 SecondService 变体
    #[arg(long, default_value = "cloud")]
    variant: String,

    /// 日志过滤指令
    #[arg(long, default_value = "info")]
    log_level: String,

    /// 使用 JSON 日志格式
    #[arg(long)]
    json_logs: bool,

    /// 只校验注册表，不运行应用
    #[arg(long)]
    validate_only: bool,
}

/// 应用主组件
#[derive(component_macros::Component)]
#[component(auto_register)]
struct App {
    base: Implements<dyn Main>,
    first_service: Ref<dyn FirstService>,
}

impl App {
    fn start(&self) -> anyhow::Result<()> {
        self.base.logger().in_scope(|| info!("Running app"));
        self.first_service.get().do_something()
    }
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    init_logging(&LoggingConfig {
        filter: args.log_level.clone(),
        json_format: args.json_logs,
        ..LoggingConfig::default()
    });

    let options = ResolverOptions::load(args.config.as_deref())?;
    info!("解析器选项: {:?}", options);

    let registry = Registry::with_options(options);
    for registration in global_registry().registrations() {
        registry.register(registration);
    }

    if let Err(errors) = registry.validate() {
        for e in &errors {
            error!("{}", e);
        }
        anyhow::bail!("注册表校验失败: {} 个问题", errors.len());
    }
    if args.validate_only {
        info!("注册表校验通过: {} 个注册项", registry.len());
        return Ok(());
    }

    run::<App, anyhow::Error, _>(&registry, |app| app.start())?;

    let second = registry.resolve::<dyn SecondService>(&args.variant)?;
    second.do_something_else();

    info!("应用已退出");
    Ok(())
}
