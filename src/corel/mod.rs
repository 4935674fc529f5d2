//! CorelDRAW COM 自动化（仅 Windows）
//!
//! 这一层只做"晚绑定 COM 调用"这一件事：
//! - `variant` - VARIANT 的构造 / 读取 / 释放
//! - `dispatch` - IDispatch 成员查找与 Invoke 封装
//! - `session` - CorelDRAW 会话：连接、探活、对象模型操作
//!
//! 所有代码都必须在初始化成 STA 的那个线程上运行，
//! 线程归 `infrastructure::ComExecutor` 管

pub mod dispatch;
pub mod session;
pub mod variant;

use crate::error::{AppError, AppResult, ComError};
use windows::Win32::System::Com::{CoInitializeEx, CoUninitialize, COINIT_APARTMENTTHREADED};
use windows::Win32::UI::WindowsAndMessaging::{
    DispatchMessageW, PeekMessageW, TranslateMessage, MSG, PM_REMOVE,
};

/// 把当前线程初始化为单线程套间（STA）
pub fn init_sta() -> AppResult<()> {
    let hr = unsafe { CoInitializeEx(None, COINIT_APARTMENTTHREADED) };
    if hr.is_err() {
        return Err(AppError::Com(ComError::InitFailed {
            detail: format!("{:?}", hr),
        }));
    }
    Ok(())
}

pub fn uninit_sta() {
    unsafe { CoUninitialize() };
}

/// 把积压的窗口消息都处理掉
///
/// STA 套间靠消息循环工作，长时间不泵消息会让跨套间调用假死
pub fn pump_waiting_messages() {
    unsafe {
        let mut msg = MSG::default();
        while PeekMessageW(&mut msg, None, 0, 0, PM_REMOVE).as_bool() {
            let _ = TranslateMessage(&msg);
            DispatchMessageW(&msg);
        }
    }
}
