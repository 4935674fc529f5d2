//! COM 执行器 - 基础设施层
//!
//! 持有唯一的 CorelDRAW COM 会话。COM 接口指针绑定在创建它的单线程套间
//! （STA）上，不能跨线程传递，所以这里用一个专用线程持有会话，异步侧把
//! 闭包作业发过去、在 oneshot 上等结果。线程空闲时泵一遍窗口消息，
//! 避免 STA 套间"饿死"

use super::driver::{CorelDriver, MacroArg};
use crate::corel::session::CorelSession;
use crate::error::{AppError, AppResult, ComError};
use std::path::Path;
use std::sync::mpsc;
use std::thread;
use std::time::Duration;
use tokio::sync::oneshot;
use tracing::{debug, error};

/// 在 COM 线程上执行的作业
type Job = Box<dyn FnOnce(&mut CorelSession) + Send + 'static>;

pub struct ComExecutor {
    jobs: Option<mpsc::Sender<Job>>,
    thread: Option<thread::JoinHandle<()>>,
}

impl ComExecutor {
    /// 启动 COM 工作线程（此时还不连接 CorelDRAW，
    /// 第一次 `ensure_alive` 才会真正连接）
    pub fn spawn(progid: impl Into<String>) -> AppResult<Self> {
        let progid = progid.into();
        let (tx, rx) = mpsc::channel::<Job>();

        let handle = thread::Builder::new()
            .name("corel-com".to_string())
            .spawn(move || com_thread_main(progid, rx))
            .map_err(|e| {
                AppError::Com(ComError::InitFailed {
                    detail: format!("无法创建 COM 工作线程: {}", e),
                })
            })?;

        Ok(Self {
            jobs: Some(tx),
            thread: Some(handle),
        })
    }

    /// 把一个作业送到 COM 线程执行并等待结果
    async fn with_session<T, F>(&self, f: F) -> AppResult<T>
    where
        F: FnOnce(&mut CorelSession) -> AppResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let (reply_tx, reply_rx) = oneshot::channel();
        let job: Job = Box::new(move |session| {
            let _ = reply_tx.send(f(session));
        });

        self.jobs
            .as_ref()
            .ok_or(AppError::Com(ComError::ThreadGone))?
            .send(job)
            .map_err(|_| AppError::Com(ComError::ThreadGone))?;

        reply_rx
            .await
            .map_err(|_| AppError::Com(ComError::ThreadGone))?
    }
}

impl Drop for ComExecutor {
    fn drop(&mut self) {
        // 关掉通道让工作线程退出，再等它收尾
        self.jobs.take();
        if let Some(handle) = self.thread.take() {
            let _ = handle.join();
        }
    }
}

fn com_thread_main(progid: String, jobs: mpsc::Receiver<Job>) {
    if let Err(e) = crate::corel::init_sta() {
        // 初始化失败时直接退出，所有在等的调用方会收到 ThreadGone
        error!("COM 初始化失败，工作线程退出: {}", e);
        return;
    }

    let mut session = CorelSession::new(progid);

    loop {
        match jobs.recv_timeout(Duration::from_millis(100)) {
            Ok(job) => job(&mut session),
            Err(mpsc::RecvTimeoutError::Timeout) => crate::corel::pump_waiting_messages(),
            Err(mpsc::RecvTimeoutError::Disconnected) => break,
        }
    }

    // 先释放会话里的接口指针，再关闭 COM
    drop(session);
    crate::corel::uninit_sta();
    debug!("COM 工作线程已退出");
}

impl CorelDriver for ComExecutor {
    async fn ensure_alive(&self) -> AppResult<()> {
        self.with_session(|s| s.ensure_alive()).await
    }

    async fn version(&self) -> AppResult<String> {
        self.with_session(|s| s.version()).await
    }

    async fn document_count(&self) -> AppResult<usize> {
        self.with_session(|s| s.document_count()).await
    }

    async fn close_all_documents(&self) -> AppResult<()> {
        self.with_session(|s| s.close_all_documents()).await
    }

    async fn open_document(&self, path: &Path) -> AppResult<()> {
        let path = path.to_path_buf();
        self.with_session(move |s| s.open_document(&path)).await
    }

    async fn close_active_document(&self) -> AppResult<()> {
        self.with_session(|s| s.close_active_document()).await
    }

    async fn missing_fonts(&self) -> AppResult<Vec<String>> {
        self.with_session(|s| s.missing_fonts()).await
    }

    async fn start_macro(&self, project: &str, entry: &str, args: &[MacroArg]) -> AppResult<()> {
        let project = project.to_string();
        let entry = entry.to_string();
        let args = args.to_vec();
        self.with_session(move |s| s.start_macro(&project, &entry, &args))
            .await
    }

    async fn busy(&self) -> AppResult<Option<bool>> {
        self.with_session(|s| s.busy()).await
    }

    async fn active_document_ready(&self) -> AppResult<bool> {
        self.with_session(|s| s.active_document_ready()).await
    }
}
