use anyhow::Result;

#[cfg(windows)]
#[tokio::main]
async fn main() -> Result<()> {
    use tratamento_automatico::orchestrator::App;
    use tratamento_automatico::{utils, Config};

    // 加载配置
    let config = Config::load();

    // 初始化日志
    utils::logging::init(config.verbose_logging);

    // 初始化并运行应用（主循环不会正常返回）
    App::initialize(config).await?.run().await
}

#[cfg(not(windows))]
fn main() -> Result<()> {
    anyhow::bail!("CorelDRAW 自动化只能在 Windows 上运行")
}
