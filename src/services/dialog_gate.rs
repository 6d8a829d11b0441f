//! # 对话框名额
//!
//! 每种原生对话框同时最多显示一个。同类对话框仍在显示时到达的请求会被拒绝，
//! 由调用方按"用户取消"返回。

use std::sync::atomic::{AtomicBool, Ordering};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogKind {
    Open,
    Save,
}

/// Tauri managed state：记录当前正在显示的对话框种类
#[derive(Debug, Default)]
pub struct DialogGate {
    open: AtomicBool,
    save: AtomicBool,
}

/// 对话框显示期间持有的名额，drop 时自动释放
pub struct DialogSlot<'a> {
    flag: &'a AtomicBool,
}

impl DialogGate {
    pub fn new() -> Self {
        Self::default()
    }

    fn flag(&self, kind: DialogKind) -> &AtomicBool {
        match kind {
            DialogKind::Open => &self.open,
            DialogKind::Save => &self.save,
        }
    }

    /// 申请 `kind` 的名额
    ///
    /// # 返回值
    /// 同类对话框正在显示时返回 `None`
    pub fn try_acquire(&self, kind: DialogKind) -> Option<DialogSlot<'_>> {
        let flag = self.flag(kind);
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()?;
        Some(DialogSlot { flag })
    }

    #[cfg(test)]
    pub fn is_showing(&self, kind: DialogKind) -> bool {
        self.flag(kind).load(Ordering::Acquire)
    }
}

impl Drop for DialogSlot<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn refuses_second_dialog_of_same_kind() {
        let gate = DialogGate::new();
        let slot = gate.try_acquire(DialogKind::Open).expect("first open dialog");
        assert!(gate.is_showing(DialogKind::Open));
        assert!(gate.try_acquire(DialogKind::Open).is_none());

        drop(slot);
        assert!(!gate.is_showing(DialogKind::Open));
        assert!(gate.try_acquire(DialogKind::Open).is_some());
    }

    #[test]
    fn kinds_are_independent() {
        let gate = DialogGate::new();
        let _open = gate.try_acquire(DialogKind::Open).unwrap();
        assert!(gate.try_acquire(DialogKind::Save).is_some());
    }
}
