//! 存在性检查结果

use serde::Serialize;

/// 三态存在性：存在 / 不存在 / 因存储故障无法判断
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Presence {
    Present,
    Absent,
    Indeterminate,
}

impl Presence {
    pub fn from_found(found: bool) -> Self {
        if found {
            Presence::Present
        } else {
            Presence::Absent
        }
    }

    pub fn is_present(&self) -> bool {
        matches!(self, Presence::Present)
    }
}

/// 站点/应用程序池的存在性及运行状态
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ObjectStatus {
    pub presence: Presence,
    /// 仅在 `Present` 时有值
    pub state: Option<crate::domain::site::ObjectState>,
}

impl ObjectStatus {
    pub fn absent() -> Self {
        Self {
            presence: Presence::Absent,
            state: None,
        }
    }

    pub fn indeterminate() -> Self {
        Self {
            presence: Presence::Indeterminate,
            state: None,
        }
    }
}
