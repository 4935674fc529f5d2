//! 晚绑定 IDispatch 封装
//!
//! CorelDRAW 的对象模型按成员名动态取 DISPID 再 Invoke，
//! 跟 VBA / win32com 的做法一致，不依赖类型库

use super::variant;
use crate::error::{AppError, ComError};
use windows::core::{GUID, PCWSTR};
use windows::Win32::System::Com::{
    IDispatch, DISPATCH_FLAGS, DISPATCH_METHOD, DISPATCH_PROPERTYGET, DISPATCH_PROPERTYPUT,
    DISPPARAMS, EXCEPINFO,
};
use windows::Win32::System::Variant::VARIANT;

const LOCALE_USER_DEFAULT: u32 = 0x0400;
const DISPID_PROPERTYPUT: i32 = -3;
const DISP_E_UNKNOWNNAME: windows::core::HRESULT =
    windows::core::HRESULT(0x8002_0006_u32 as i32);
const DISP_E_EXCEPTION: windows::core::HRESULT = windows::core::HRESULT(0x8002_0009_u32 as i32);

/// 晚绑定调用错误
#[derive(thiserror::Error, Debug)]
pub enum ComCallError {
    #[error("对象没有成员 {name}")]
    UnknownMember { name: String },
    #[error("调用 {member} 失败: {source}")]
    Call {
        member: String,
        #[source]
        source: windows::core::Error,
    },
    #[error("{member} 抛出了异常: {description}")]
    Exception { member: String, description: String },
    #[error("{member} 没有返回对象")]
    NotAnObject { member: String },
}

impl From<ComCallError> for AppError {
    fn from(err: ComCallError) -> Self {
        match err {
            ComCallError::UnknownMember { name } => {
                AppError::Com(ComError::UnknownMember { member: name })
            }
            ComCallError::Call { member, source } => AppError::Com(ComError::CallFailed {
                member,
                source: Box::new(source),
            }),
            ComCallError::Exception {
                member,
                description,
            } => AppError::Com(ComError::CallFailed {
                member,
                source: description.into(),
            }),
            ComCallError::NotAnObject { member } => {
                AppError::Com(ComError::UnexpectedValue { member })
            }
        }
    }
}

pub fn is_unknown_member(err: &ComCallError) -> bool {
    matches!(err, ComCallError::UnknownMember { .. })
}

/// 一个晚绑定的 COM 对象
#[derive(Clone)]
pub struct DispatchObject {
    inner: IDispatch,
}

impl DispatchObject {
    pub fn new(inner: IDispatch) -> Self {
        Self { inner }
    }

    fn dispid(&self, name: &str) -> Result<i32, ComCallError> {
        let wide: Vec<u16> = name.encode_utf16().chain(std::iter::once(0)).collect();
        let name_ptr = PCWSTR(wide.as_ptr());
        let mut dispid = 0i32;
        unsafe {
            self.inner.GetIDsOfNames(
                &GUID::zeroed(),
                &name_ptr,
                1,
                LOCALE_USER_DEFAULT,
                &mut dispid,
            )
        }
        .map_err(|e| {
            if e.code() == DISP_E_UNKNOWNNAME {
                ComCallError::UnknownMember {
                    name: name.to_string(),
                }
            } else {
                ComCallError::Call {
                    member: name.to_string(),
                    source: e,
                }
            }
        })?;
        Ok(dispid)
    }

    fn invoke(
        &self,
        member: &str,
        flags: DISPATCH_FLAGS,
        mut args: Vec<VARIANT>,
        named_put: bool,
    ) -> Result<VARIANT, ComCallError> {
        let dispid = self.dispid(member)?;

        // DISPPARAMS 约定参数倒序排列
        args.reverse();
        let mut put_dispid = DISPID_PROPERTYPUT;
        let params = DISPPARAMS {
            rgvarg: if args.is_empty() {
                std::ptr::null_mut()
            } else {
                args.as_mut_ptr()
            },
            rgdispidNamedArgs: if named_put {
                &mut put_dispid as *mut i32
            } else {
                std::ptr::null_mut()
            },
            cArgs: args.len() as u32,
            cNamedArgs: if named_put { 1 } else { 0 },
        };

        let mut result = VARIANT::default();
        let mut excep = EXCEPINFO::default();
        let invoked = unsafe {
            self.inner.Invoke(
                dispid,
                &GUID::zeroed(),
                LOCALE_USER_DEFAULT,
                flags,
                &params,
                Some(&mut result),
                Some(&mut excep),
                None,
            )
        };
        variant::clear_all(&mut args);

        match invoked {
            Ok(()) => Ok(result),
            Err(e) if e.code() == DISP_E_EXCEPTION => Err(ComCallError::Exception {
                member: member.to_string(),
                description: excep.bstrDescription.to_string(),
            }),
            Err(e) => Err(ComCallError::Call {
                member: member.to_string(),
                source: e,
            }),
        }
    }

    /// 读属性
    pub fn get(&self, name: &str) -> Result<VARIANT, ComCallError> {
        self.invoke(name, DISPATCH_PROPERTYGET, Vec::new(), false)
    }

    /// 写属性
    pub fn put(&self, name: &str, value: VARIANT) -> Result<(), ComCallError> {
        let mut result = self.invoke(name, DISPATCH_PROPERTYPUT, vec![value], true)?;
        variant::clear(&mut result);
        Ok(())
    }

    /// 调用方法（带下标的属性在 COM 里也按这个路径走）
    pub fn call(&self, name: &str, args: Vec<VARIANT>) -> Result<VARIANT, ComCallError> {
        self.invoke(name, DISPATCH_METHOD | DISPATCH_PROPERTYGET, args, false)
    }

    /// 调用方法并丢弃返回值
    pub fn call_void(&self, name: &str, args: Vec<VARIANT>) -> Result<(), ComCallError> {
        let mut result = self.call(name, args)?;
        variant::clear(&mut result);
        Ok(())
    }

    /// 读对象型属性
    pub fn get_object(&self, name: &str) -> Result<DispatchObject, ComCallError> {
        let v = self.get(name)?;
        variant::take_dispatch(v)
            .map(DispatchObject::new)
            .ok_or_else(|| ComCallError::NotAnObject {
                member: name.to_string(),
            })
    }

    /// 调用返回对象的方法
    pub fn call_object(&self, name: &str, args: Vec<VARIANT>) -> Result<DispatchObject, ComCallError> {
        let v = self.call(name, args)?;
        variant::take_dispatch(v)
            .map(DispatchObject::new)
            .ok_or_else(|| ComCallError::NotAnObject {
                member: name.to_string(),
            })
    }
}
