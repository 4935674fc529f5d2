//! CorelDRAW 会话
//!
//! 会话是惰性的：创建时不连接，第一次用到（或探活失败后）才去
//! ROT 找已打开的实例，找不到就启动一个新实例

use super::dispatch::{is_unknown_member, DispatchObject};
use super::variant;
use crate::error::{AppError, AppResult, ComError};
use crate::infrastructure::MacroArg;
use std::path::Path;
use tracing::{debug, info, warn};
use windows::core::{ComInterface, HSTRING, IUnknown};
use windows::Win32::System::Com::{
    CLSIDFromProgID, CoCreateInstance, GetActiveObject, IDispatch, CLSCTX_LOCAL_SERVER,
};

pub struct CorelSession {
    progid: String,
    app: Option<DispatchObject>,
}

impl CorelSession {
    pub fn new(progid: String) -> Self {
        Self { progid, app: None }
    }

    /// 确保有一个响应的 CorelDRAW 实例
    ///
    /// 已有会话时用 Version 探活；探活失败则丢弃旧会话重新连接
    pub fn ensure_alive(&mut self) -> AppResult<()> {
        if let Some(app) = &self.app {
            if app.get("Version").map(variant::take_string).is_ok() {
                return Ok(());
            }
            warn!("CorelDRAW 没有响应，重新连接...");
            self.app = None;
        }

        let app = self.attach_or_launch()?;
        suppress_alerts(&app);

        if let Ok(v) = app.get("Version") {
            if let Some(version) = variant::take_string(v) {
                info!("✓ 已连接到 CorelDRAW {}", version);
            }
        }

        self.app = Some(app);
        Ok(())
    }

    fn app(&mut self) -> AppResult<DispatchObject> {
        if let Some(app) = &self.app {
            return Ok(app.clone());
        }
        self.ensure_alive()?;
        self.app.clone().ok_or_else(|| {
            AppError::Com(ComError::InitFailed {
                detail: "会话未建立".to_string(),
            })
        })
    }

    /// 先从 ROT 找已打开的实例，找不到再启动新实例
    fn attach_or_launch(&self) -> AppResult<DispatchObject> {
        let progid: HSTRING = self.progid.as_str().into();
        let clsid = unsafe { CLSIDFromProgID(&progid) }
            .map_err(|e| AppError::com_attach_failed(&self.progid, e))?;

        let mut running: Option<IUnknown> = None;
        let attach = unsafe { GetActiveObject(&clsid, None, &mut running) };
        if attach.is_ok() {
            if let Some(unk) = running {
                if let Ok(disp) = unk.cast::<IDispatch>() {
                    debug!("从 ROT 连接到已打开的实例");
                    return Ok(DispatchObject::new(disp));
                }
            }
        }

        info!("没有检测到 CorelDRAW 实例，正在启动...");
        let disp: IDispatch = unsafe { CoCreateInstance(&clsid, None, CLSCTX_LOCAL_SERVER) }
            .map_err(|e| AppError::com_attach_failed(&self.progid, e))?;
        let app = DispatchObject::new(disp);
        if let Err(e) = app.put("Visible", variant::from_bool(true)) {
            debug!("设置 Visible 失败: {}", e);
        }
        Ok(app)
    }

    pub fn version(&mut self) -> AppResult<String> {
        let app = self.app()?;
        let v = app.get("Version")?;
        variant::take_string(v).ok_or_else(|| {
            AppError::Com(ComError::UnexpectedValue {
                member: "Version".to_string(),
            })
        })
    }

    pub fn document_count(&mut self) -> AppResult<usize> {
        let app = self.app()?;
        let docs = app.get_object("Documents")?;
        let count = variant::take_i32(docs.get("Count")?).ok_or_else(|| {
            AppError::Com(ComError::UnexpectedValue {
                member: "Documents.Count".to_string(),
            })
        })?;
        Ok(count.max(0) as usize)
    }

    pub fn close_all_documents(&mut self) -> AppResult<()> {
        let app = self.app()?;
        let docs = app.get_object("Documents")?;
        // 关一个少一个，所以始终取第 1 个（COM 集合下标从 1 开始）
        let mut guard = 0;
        loop {
            let count = variant::take_i32(docs.get("Count")?).unwrap_or(0);
            if count <= 0 || guard >= 64 {
                break;
            }
            let doc = docs.call_object("Item", vec![variant::from_i32(1)])?;
            doc.call_void("Close", Vec::new())?;
            guard += 1;
        }
        Ok(())
    }

    pub fn open_document(&mut self, path: &Path) -> AppResult<()> {
        let app = self.app()?;
        let path_str = path.display().to_string();
        app.call_void("OpenDocument", vec![variant::from_str(&path_str)])?;
        Ok(())
    }

    pub fn close_active_document(&mut self) -> AppResult<()> {
        let app = self.app()?;
        let doc = app.get_object("ActiveDocument")?;
        doc.call_void("Close", Vec::new())?;
        Ok(())
    }

    /// 活动文档缺失的字体
    ///
    /// 新版本走 MissingFontListCount / MissingFontList(i)；
    /// 老版本退回 Fonts 集合挨个查 IsInstalled；都不支持就当没有缺失
    pub fn missing_fonts(&mut self) -> AppResult<Vec<String>> {
        let app = self.app()?;
        let doc = app.get_object("ActiveDocument")?;

        match doc.get("MissingFontListCount") {
            Ok(count) => {
                let count = variant::take_i32(count).unwrap_or(0);
                let mut fonts = Vec::new();
                for i in 0..count {
                    let item = doc.call("MissingFontList", vec![variant::from_i32(i)])?;
                    // 有的版本直接返回字体名，有的返回 Font 对象
                    if variant::is_string(&item) {
                        if let Some(name) = variant::take_string(item) {
                            fonts.push(name);
                        }
                    } else if let Some(font) = variant::take_dispatch(item) {
                        let font = DispatchObject::new(font);
                        if let Some(name) = variant::take_string(font.get("Name")?) {
                            fonts.push(name);
                        }
                    }
                }
                return Ok(fonts);
            }
            Err(e) if is_unknown_member(&e) => {}
            Err(e) => return Err(e.into()),
        }

        match doc.get_object("Fonts") {
            Ok(fonts_obj) => {
                let count = variant::take_i32(fonts_obj.get("Count")?).unwrap_or(0);
                let mut fonts = Vec::new();
                for i in 1..=count {
                    let font = fonts_obj.call_object("Item", vec![variant::from_i32(i)])?;
                    let installed = match font.get("IsInstalled") {
                        Ok(v) => variant::take_bool(v).unwrap_or(true),
                        Err(_) => true,
                    };
                    if !installed {
                        if let Some(name) = variant::take_string(font.get("Name")?) {
                            fonts.push(name);
                        }
                    }
                }
                Ok(fonts)
            }
            Err(_) => {
                debug!("对象模型不支持缺字体查询，跳过检查");
                Ok(Vec::new())
            }
        }
    }

    pub fn start_macro(&mut self, project: &str, entry: &str, args: &[MacroArg]) -> AppResult<()> {
        let app = self.app()?;
        let gms = app
            .get_object("GMSManager")
            .map_err(|e| AppError::macro_launch_failed(entry, e))?;

        let mut call_args = vec![variant::from_str(project), variant::from_str(entry)];
        for arg in args {
            call_args.push(match arg {
                MacroArg::Bool(b) => variant::from_bool(*b),
                MacroArg::I32(n) => variant::from_i32(*n),
                MacroArg::Str(s) => variant::from_str(s),
            });
        }

        gms.call_void("RunMacro", call_args)
            .map_err(|e| AppError::macro_launch_failed(entry, e))?;
        Ok(())
    }

    /// Busy 属性探测不到时返回 None（上层会退回 Pages.Count 轮询）
    pub fn busy(&mut self) -> AppResult<Option<bool>> {
        let app = self.app()?;
        match app.get("Busy") {
            Ok(v) => Ok(variant::take_bool(v)),
            Err(_) => Ok(None),
        }
    }

    /// `ActiveDocument.Pages.Count` 能访问说明宏已经把文档还回来了
    pub fn active_document_ready(&mut self) -> AppResult<bool> {
        let app = self.app()?;
        let probe = app
            .get_object("ActiveDocument")
            .and_then(|doc| doc.get_object("Pages"))
            .and_then(|pages| pages.get("Count"));
        match probe {
            Ok(mut v) => {
                variant::clear(&mut v);
                Ok(true)
            }
            Err(_) => Ok(false),
        }
    }
}

/// 关掉弹窗（包括缺字体提示），两条路都试
fn suppress_alerts(app: &DispatchObject) {
    if app.put("DisplayAlerts", variant::from_bool(false)).is_ok() {
        return;
    }
    let fallback = app
        .get_object("Preferences")
        .and_then(|prefs| prefs.get_object("Application"))
        .and_then(|prefs_app| prefs_app.put("EnableAlerts", variant::from_bool(false)));
    if let Err(e) = fallback {
        debug!("无法关闭提示框: {}", e);
    }
}
