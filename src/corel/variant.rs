//! VARIANT 构造与读取
//!
//! 约定：`from_*` 构造出的 VARIANT 归调用方所有，最终要经 `clear` 释放；
//! `take_*` 消费传入的 VARIANT（读完即释放），所以不会泄漏 BSTR / 接口指针

use std::mem::ManuallyDrop;
use windows::core::BSTR;
use windows::Win32::Foundation::{VARIANT_FALSE, VARIANT_TRUE};
use windows::Win32::System::Com::IDispatch;
use windows::Win32::System::Variant::{
    VariantClear, VARENUM, VARIANT, VARIANT_0, VARIANT_0_0, VARIANT_0_0_0, VT_BOOL, VT_BSTR,
    VT_DISPATCH, VT_I2, VT_I4,
};

fn build(vt: VARENUM, value: VARIANT_0_0_0) -> VARIANT {
    VARIANT {
        Anonymous: VARIANT_0 {
            Anonymous: ManuallyDrop::new(VARIANT_0_0 {
                vt,
                wReserved1: 0,
                wReserved2: 0,
                wReserved3: 0,
                Anonymous: value,
            }),
        },
    }
}

pub fn from_str(s: &str) -> VARIANT {
    build(
        VT_BSTR,
        VARIANT_0_0_0 {
            bstrVal: ManuallyDrop::new(BSTR::from(s)),
        },
    )
}

pub fn from_bool(b: bool) -> VARIANT {
    build(
        VT_BOOL,
        VARIANT_0_0_0 {
            boolVal: if b { VARIANT_TRUE } else { VARIANT_FALSE },
        },
    )
}

pub fn from_i32(n: i32) -> VARIANT {
    build(VT_I4, VARIANT_0_0_0 { lVal: n })
}

pub fn kind(v: &VARIANT) -> VARENUM {
    unsafe { v.Anonymous.Anonymous.vt }
}

pub fn is_string(v: &VARIANT) -> bool {
    kind(v) == VT_BSTR
}

/// 读出字符串并释放；类型不符返回 None
pub fn take_string(mut v: VARIANT) -> Option<String> {
    let out = unsafe {
        if v.Anonymous.Anonymous.vt == VT_BSTR {
            Some(v.Anonymous.Anonymous.Anonymous.bstrVal.to_string())
        } else {
            None
        }
    };
    clear(&mut v);
    out
}

/// 读出布尔值并释放；类型不符返回 None
pub fn take_bool(mut v: VARIANT) -> Option<bool> {
    let out = unsafe {
        if v.Anonymous.Anonymous.vt == VT_BOOL {
            Some(v.Anonymous.Anonymous.Anonymous.boolVal.0 != 0)
        } else {
            None
        }
    };
    clear(&mut v);
    out
}

/// 读出整数并释放；类型不符返回 None
pub fn take_i32(mut v: VARIANT) -> Option<i32> {
    let out = unsafe {
        let vt = v.Anonymous.Anonymous.vt;
        if vt == VT_I4 {
            Some(v.Anonymous.Anonymous.Anonymous.lVal)
        } else if vt == VT_I2 {
            Some(v.Anonymous.Anonymous.Anonymous.iVal as i32)
        } else {
            None
        }
    };
    clear(&mut v);
    out
}

/// 读出接口指针（AddRef 后）并释放；类型不符返回 None
pub fn take_dispatch(mut v: VARIANT) -> Option<IDispatch> {
    let out = unsafe {
        if v.Anonymous.Anonymous.vt == VT_DISPATCH {
            (*v.Anonymous.Anonymous.Anonymous.pdispVal).clone()
        } else {
            None
        }
    };
    clear(&mut v);
    out
}

pub fn clear(v: &mut VARIANT) {
    unsafe {
        let _ = VariantClear(v);
    }
}

pub fn clear_all(vs: &mut [VARIANT]) {
    for v in vs {
        clear(v);
    }
}
