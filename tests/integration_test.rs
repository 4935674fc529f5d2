//! 真机集成测试：需要本机装有 CorelDRAW
#![cfg(windows)]

use std::path::Path;
use tratamento_automatico::infrastructure::{ComExecutor, CorelDriver};
use tratamento_automatico::workflow::{ArtworkCtx, ArtworkFlow};
use tratamento_automatico::Config;

#[tokio::test]
#[ignore] // 默认忽略，需要手动运行：cargo test -- --ignored
async fn test_corel_connection() {
    // 初始化日志
    tratamento_automatico::utils::logging::init(true);

    // 加载配置
    let config = Config::from_env();

    // 连接（或启动）CorelDRAW
    let driver = ComExecutor::spawn(config.corel_progid.clone()).expect("无法启动 COM 线程");
    driver.ensure_alive().await.expect("连接 CorelDRAW 失败");

    let version = driver.version().await.expect("读取版本失败");
    println!("CorelDRAW 版本: {}", version);
}

#[tokio::test]
#[ignore]
async fn test_treat_single_file() {
    // 初始化日志
    tratamento_automatico::utils::logging::init(true);

    // 加载配置
    let config = Config::from_env();

    // 连接（或启动）CorelDRAW
    let driver = ComExecutor::spawn(config.corel_progid.clone()).expect("无法启动 COM 线程");
    driver.ensure_alive().await.expect("连接 CorelDRAW 失败");

    // 注意：请根据实际情况修改文件路径
    let artwork = Path::new(r"Z:\Pedidos\Digital Colorido\teste\arte-banner.cdr");

    let flow = ArtworkFlow::new(&config);
    let ctx = ArtworkCtx::new(
        1,
        artwork.parent().unwrap().to_path_buf(),
        artwork.to_path_buf(),
    );

    let result = flow.run(&driver, &ctx).await.expect("处理稿件失败");
    println!("处理结果: {:?}", result);
}

#[tokio::test]
#[ignore]
async fn test_scan_hotfolders() {
    // 加载配置
    let config = Config::from_env();

    // 扫描真实的热文件夹
    let candidates = tratamento_automatico::collect_candidates(&config)
        .await
        .expect("扫描失败");

    println!("找到 {} 个候选稿件", candidates.len());
    for c in candidates.iter().take(5) {
        println!("  - {}", c.path.display());
    }
}
